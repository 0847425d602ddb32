/// Built-in API → capability table.
///
/// Names are the bare callee names the provider resolves (last member
/// segment), so `geoLocationManager.getCurrentLocation` is keyed as
/// `getCurrentLocation`.
pub(crate) const BUILTIN_APIS: &[(&str, &str)] = &[
    // Location
    ("getCurrentLocation", "SystemCapability.Location.Location.Core"),
    ("getLastLocation", "SystemCapability.Location.Location.Core"),
    ("isLocationEnabled", "SystemCapability.Location.Location.Core"),
    ("getAddressesFromLocation", "SystemCapability.Location.Location.Geocoder"),
    ("getAddressesFromLocationName", "SystemCapability.Location.Location.Geocoder"),
    ("isGeocoderAvailable", "SystemCapability.Location.Location.Geocoder"),
    ("getCachedGnssLocationsSize", "SystemCapability.Location.Location.Gnss"),
    // Bluetooth
    ("startBLEScan", "SystemCapability.Communication.Bluetooth.Core"),
    ("stopBLEScan", "SystemCapability.Communication.Bluetooth.Core"),
    ("createGattClientDevice", "SystemCapability.Communication.Bluetooth.Core"),
    ("getPairedDevices", "SystemCapability.Communication.Bluetooth.Core"),
    // Wi-Fi
    ("isWifiActive", "SystemCapability.Communication.WiFi.STA"),
    ("getScanInfoList", "SystemCapability.Communication.WiFi.STA"),
    ("getLinkedInfo", "SystemCapability.Communication.WiFi.STA"),
    // NFC
    ("isNfcOpen", "SystemCapability.Communication.NFC.Core"),
    ("getNfcState", "SystemCapability.Communication.NFC.Core"),
    ("getHceService", "SystemCapability.Communication.NFC.CardEmulation"),
    // Camera and media
    ("getCameraManager", "SystemCapability.Multimedia.Camera.Core"),
    ("createAVPlayer", "SystemCapability.Multimedia.Media.AVPlayer"),
    ("createAVRecorder", "SystemCapability.Multimedia.Media.AVRecorder"),
    ("createAudioCapturer", "SystemCapability.Multimedia.Audio.Capturer"),
    ("getPhotoAccessHelper", "SystemCapability.FileManagement.PhotoAccessHelper.Core"),
    // Sensors
    ("getSensorList", "SystemCapability.Sensors.Sensor"),
    ("startVibration", "SystemCapability.Sensors.MiscDevice"),
    // Telephony
    ("getSimState", "SystemCapability.Telephony.CoreService"),
    ("sendShortMessage", "SystemCapability.Telephony.SmsMms"),
    ("makeCall", "SystemCapability.Applications.Contacts"),
    // User authentication
    ("getUserAuthInstance", "SystemCapability.UserIAM.UserAuth.Core"),
    ("getAvailableStatus", "SystemCapability.UserIAM.UserAuth.Core"),
    // Networking
    ("createHttp", "SystemCapability.Communication.NetStack"),
    ("createWebSocket", "SystemCapability.Communication.NetStack"),
];
