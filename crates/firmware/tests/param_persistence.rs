//! Parameter persistence across reboots on mock Flash
//!
//! Exercises the full device stack (EEPROM emulation over Flash, boot
//! recovery, typed accessors) through power loss, corruption and firmware
//! upgrades.

use wifi_bridge_core::parameters::{
    calculate_crc32, pack_version, BootOutcome, BridgeParameters, FactoryDefaults, ParamId,
    StoreError, EEPROM_CRC_OFFSET, EEPROM_SPACE,
};
use wifi_bridge_core::traits::{MediumError, NullObserver};
use wifi_bridge_firmware::parameters::{
    build_defaults, firmware_version, open_bridge_store, BridgeStore, ParamHandler,
};
use wifi_bridge_firmware::platform::mock::{
    MockFlash, MOCK_BLOCK_SIZE, MOCK_EEPROM_SECTOR, MOCK_FIRMWARE_SIZE,
};

const PAYLOAD_LEN: usize = 49;

fn boot(flash: MockFlash) -> BridgeStore<MockFlash> {
    open_bridge_store(flash, MOCK_EEPROM_SECTOR, MOCK_FIRMWARE_SIZE).unwrap()
}

/// Power off: uncommitted cache contents are lost
fn power_off(params: BridgeStore<MockFlash>) -> MockFlash {
    params.into_medium().into_inner()
}

fn sector(flash: &MockFlash, offset: usize, len: usize) -> &[u8] {
    flash.get_contents(MOCK_EEPROM_SECTOR + offset as u32, len)
}

#[test]
fn test_first_boot_writes_defaults_with_crc() {
    let params = boot(MockFlash::new());
    let defaults = build_defaults();

    assert!(matches!(
        params.store().boot_outcome(),
        BootOutcome::Restored { .. }
    ));
    assert_eq!(params.wifi_channel(), defaults.wifi_channel);
    assert_eq!(params.uart_baud_rate(), defaults.uart_baud_rate);
    assert_eq!(params.sw_version(), firmware_version());

    let flash = power_off(params);
    let payload = sector(&flash, 0, PAYLOAD_LEN);
    let crc = calculate_crc32(payload);

    assert_eq!(&payload[..4], &firmware_version().to_le_bytes());
    assert!(sector(&flash, PAYLOAD_LEN, EEPROM_CRC_OFFSET - PAYLOAD_LEN)
        .iter()
        .all(|&b| b == 0));
    assert_eq!(sector(&flash, EEPROM_CRC_OFFSET, 4), &crc.to_le_bytes());
    assert_eq!(sector(&flash, EEPROM_CRC_OFFSET + 4, 4), &[0; 4]);
    // Rest of the sector stays erased
    assert!(sector(&flash, EEPROM_SPACE, 64).iter().all(|&b| b == 0xFF));
}

#[test]
fn test_settings_survive_reboot() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_ssid("Workshop");
    params.set_wifi_password("s3cret-pass");
    params.set_wifi_channel(1);
    params.set_wifi_udp_hport(14560);
    params.set_uart_baud_rate(115_200);
    params.set_debug_enabled(1);
    params.save_all().unwrap();

    let params = boot(power_off(params));

    assert_eq!(params.store().boot_outcome(), BootOutcome::Trusted);
    assert_eq!(params.wifi_ssid_str(), "Workshop");
    assert_eq!(params.wifi_password_str(), "s3cret-pass");
    assert_eq!(params.wifi_channel(), 1);
    assert_eq!(params.wifi_udp_hport(), 14560);
    assert_eq!(params.uart_baud_rate(), 115_200);
    assert_eq!(params.debug_enabled(), 1);
}

#[test]
fn test_unsaved_settings_are_lost() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_channel(4);

    let params = boot(power_off(params));
    assert_eq!(params.wifi_channel(), build_defaults().wifi_channel);
}

#[test]
fn test_power_loss_during_save_restores_defaults() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_channel(6);
    params
        .store_mut()
        .medium_mut()
        .flash_mut()
        .simulate_power_loss();
    // Only the first half of the region reaches Flash; the trailer stays erased
    params.save_all().unwrap();

    let flash = power_off(params);
    assert_eq!(sector(&flash, EEPROM_CRC_OFFSET, 4), &[0xFF; 4]);

    let params = boot(flash);
    assert!(matches!(
        params.store().boot_outcome(),
        BootOutcome::Restored {
            saved_crc: 0xFFFF_FFFF,
            ..
        }
    ));
    assert_eq!(params.wifi_channel(), build_defaults().wifi_channel);
}

#[test]
fn test_corrupted_payload_restores_defaults() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_ssid("Corrupt-me");
    params.save_all().unwrap();

    let mut flash = power_off(params);
    let ssid_offset = params_offset(ParamId::WifiSsid1);
    flash.inject_corruption(MOCK_EEPROM_SECTOR + ssid_offset as u32, 2);

    let params = boot(flash);
    assert!(matches!(
        params.store().boot_outcome(),
        BootOutcome::Restored { .. }
    ));
    assert_eq!(params.wifi_ssid(), &build_defaults().ssid);

    // Recovery rewrote a valid image
    let params = boot(power_off(params));
    assert_eq!(params.store().boot_outcome(), BootOutcome::Trusted);
}

#[test]
fn test_corrupted_trailer_restores_defaults() {
    let mut params = boot(MockFlash::new());
    params.set_uart_baud_rate(57_600);
    params.save_all().unwrap();

    let mut flash = power_off(params);
    flash.inject_corruption(MOCK_EEPROM_SECTOR + EEPROM_CRC_OFFSET as u32, 4);

    let params = boot(flash);
    assert_eq!(params.uart_baud_rate(), build_defaults().uart_baud_rate);
}

#[test]
fn test_failed_erase_keeps_previous_image() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_channel(9);
    params.save_all().unwrap();

    params.set_wifi_channel(13);
    params.store_mut().medium_mut().flash_mut().fail_next_erase();
    assert_eq!(
        params.save_all(),
        Err(StoreError::Medium(MediumError::CommitFailed))
    );

    let params = boot(power_off(params));
    assert_eq!(params.store().boot_outcome(), BootOutcome::Trusted);
    assert_eq!(params.wifi_channel(), 9);
}

#[test]
fn test_unchanged_save_does_not_erase() {
    let mut params = boot(MockFlash::new());
    let erases = params.store().medium().flash().get_erase_count(MOCK_EEPROM_SECTOR);
    assert_eq!(erases, 1);

    params.save_all().unwrap();
    params.save_all().unwrap();
    assert_eq!(
        params.store().medium().flash().get_erase_count(MOCK_EEPROM_SECTOR),
        erases
    );
}

#[test]
fn test_firmware_upgrade_replaces_version_only() {
    let old = FactoryDefaults::STANDARD.with_version(pack_version(0, 9, 1));
    let eeprom = wifi_bridge_firmware::platform::FlashEeprom::new(
        MockFlash::new(),
        MOCK_EEPROM_SECTOR,
        MOCK_FIRMWARE_SIZE,
    );
    let mut params = BridgeParameters::initialize(eeprom, old, NullObserver).unwrap();
    assert_eq!(params.sw_version(), pack_version(0, 9, 1));
    params.set_wifi_channel(2);
    params.save_all().unwrap();

    let flash = params.into_medium().into_inner();
    let params = boot(flash);

    assert_eq!(params.store().boot_outcome(), BootOutcome::Trusted);
    assert_eq!(params.sw_version(), firmware_version());
    assert_eq!(params.wifi_channel(), 2);
}

#[test]
fn test_flash_headroom_reported() {
    let params = boot(MockFlash::new());
    assert_eq!(
        params.flash_left(),
        MOCK_EEPROM_SECTOR - MOCK_FIRMWARE_SIZE
    );
    assert_eq!(params.flash_left(), MOCK_BLOCK_SIZE);
}

#[test]
fn test_handler_factory_reset_survives_reboot() {
    let mut handler = ParamHandler::new(boot(MockFlash::new()));
    handler.handle_set("WIFI_CHANNEL", 5).unwrap();
    handler.handle_save().unwrap();
    handler.handle_factory_reset().unwrap();

    let params = boot(power_off(handler.into_inner()));
    assert_eq!(params.store().boot_outcome(), BootOutcome::Trusted);
    assert_eq!(params.wifi_channel(), build_defaults().wifi_channel);
}

#[test]
fn test_identity_hash_stable_across_reboot() {
    let mut params = boot(MockFlash::new());
    params.set_wifi_udp_cport(14600);
    params.save_all().unwrap();
    let hash = params.identity_hash();

    let params = boot(power_off(params));
    assert_eq!(params.identity_hash(), hash);
}

fn params_offset(id: ParamId) -> usize {
    wifi_bridge_core::parameters::bridge_registry()
        .unwrap()
        .get(id.id())
        .map(|d| d.offset)
        .unwrap()
}
