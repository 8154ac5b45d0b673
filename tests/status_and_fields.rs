use ip5328p::data_types::{
    BoostRange, ChargePhase, GaugeLevel, NtcZone, PowerMode, ShutdownVoltage, TypeCAbility,
    TypeCAttach,
};
use ip5328p::registers::{
    boost_rail_mv, decode_boost_status, decode_charge_status, decode_input_status,
    decode_ntc_status, decode_sys_status, decode_typec_ability, decode_typec_attach,
    input_rail_mv, MosOnBits,
};

#[test]
fn sys_status_charging_at_5v() {
    // 0b0001_0001: charge flag set, mode 001.
    let status = decode_sys_status(0x11);
    assert!(status.charging);
    assert_eq!(status.mode, PowerMode::Charge5v);
}

#[test]
fn sys_status_mode_table() {
    let modes = [
        (0b000, PowerMode::Standby),
        (0b001, PowerMode::Charge5v),
        (0b010, PowerMode::SinglePortChargeDischarge),
        (0b011, PowerMode::MultiPortChargeDischarge),
        (0b100, PowerMode::FastChargeCharging),
        (0b101, PowerMode::Discharge5v),
        (0b110, PowerMode::MultiPortDischarge5v),
        (0b111, PowerMode::FastChargeDischarge),
    ];
    for (raw, mode) in modes {
        let status = decode_sys_status(raw);
        assert_eq!(status.mode, mode);
        assert!(!status.charging);
    }
}

#[test]
fn charge_status_phases_and_flags() {
    let phases = [
        (0b000, ChargePhase::Idle),
        (0b001, ChargePhase::Trickle),
        (0b010, ChargePhase::ConstantCurrent),
        (0b011, ChargePhase::ConstantVoltage),
        (0b100, ChargePhase::StopDetect),
        (0b101, ChargePhase::Done),
        (0b110, ChargePhase::Timeout),
        (0b111, ChargePhase::Reserved),
    ];
    for (raw, phase) in phases {
        assert_eq!(decode_charge_status(raw).phase, phase);
    }

    let status = decode_charge_status(0b1000_0010);
    assert!(status.charging);
    assert!(!status.full);
    assert_eq!(status.phase, ChargePhase::ConstantCurrent);

    let status = decode_charge_status(0b0100_1101);
    assert!(!status.charging);
    assert!(status.full);
    assert!(status.trickle_timeout);
    assert!(!status.cv_timeout);
    assert!(!status.total_timeout);
    assert_eq!(status.phase, ChargePhase::Done);
}

#[test]
fn input_status_key_is_active_low() {
    let status = decode_input_status(0b0011_0000);
    assert!(status.vbus_ok);
    assert!(status.vin_ok);
    assert!(status.key_pressed);

    let status = decode_input_status(0b0000_0001);
    assert!(!status.vbus_ok);
    assert!(!status.vin_ok);
    assert!(!status.key_pressed);
}

#[test]
fn ntc_zones() {
    let status = decode_ntc_status(0b0000_1011);
    assert!(status.valid);
    assert_eq!(status.zone, NtcZone::Normal);

    let status = decode_ntc_status(0b0000_0101);
    assert!(!status.valid);
    assert_eq!(status.zone, NtcZone::Hot);

    assert_eq!(decode_ntc_status(0b0000_1000).zone, NtcZone::BelowCold);
    assert_eq!(decode_ntc_status(0b0000_1110).zone, NtcZone::AboveHot);
}

#[test]
fn boost_range_highest_flag_wins() {
    let status = decode_boost_status(0x00);
    assert!(!status.fast_charge);
    assert_eq!(status.range, BoostRange::None);

    let status = decode_boost_status(0x01);
    assert!(status.fast_charge);
    assert_eq!(status.range, BoostRange::None);

    assert_eq!(decode_boost_status(0x02).range, BoostRange::V6To8);
    assert_eq!(decode_boost_status(0x04).range, BoostRange::V8To10);
    assert_eq!(decode_boost_status(0x08).range, BoostRange::V10To12);
    assert_eq!(decode_boost_status(0x0A).range, BoostRange::V10To12);
}

#[test]
fn rail_voltages() {
    assert_eq!(input_rail_mv(0b000), 5_000);
    assert_eq!(input_rail_mv(0b001), 7_000);
    assert_eq!(input_rail_mv(0b011), 9_000);
    assert_eq!(input_rail_mv(0b111), 12_000);
    // Undocumented codes fall back to the 5 V rail.
    assert_eq!(input_rail_mv(0b010), 5_000);

    assert_eq!(boost_rail_mv(BoostRange::None), 5_000);
    assert_eq!(boost_rail_mv(BoostRange::V6To8), 7_000);
    assert_eq!(boost_rail_mv(BoostRange::V8To10), 9_000);
    assert_eq!(boost_rail_mv(BoostRange::V10To12), 12_000);
}

#[test]
fn mos_bit_positions() {
    let bits = MosOnBits::from_bits_truncate(0b0101_0011);
    assert!(bits.contains(MosOnBits::OUT1));
    assert!(bits.contains(MosOnBits::OUT2));
    assert!(!bits.contains(MosOnBits::VBUS));
    assert!(bits.contains(MosOnBits::VIN));
    assert!(bits.contains(MosOnBits::VIN_VALID));
    assert!(!bits.contains(MosOnBits::CHARGE_FROM_TYPEC));
}

#[test]
fn typec_attach_and_ability() {
    assert_eq!(decode_typec_attach(0x00), TypeCAttach::Unattached);
    assert_eq!(decode_typec_attach(0x02), TypeCAttach::DeviceAttached);
    assert_eq!(decode_typec_attach(0x20), TypeCAttach::AdapterAttached);
    // An adapter outranks a device when both bits are up.
    assert_eq!(decode_typec_attach(0x22), TypeCAttach::AdapterAttached);

    assert_eq!(decode_typec_ability(0x00), TypeCAbility::Unknown);
    assert_eq!(decode_typec_ability(0x20), TypeCAbility::StandardUsb);
    assert_eq!(decode_typec_ability(0x40), TypeCAbility::Max1500Ma);
    assert_eq!(decode_typec_ability(0x80), TypeCAbility::Max3000Ma);
    assert_eq!(decode_typec_ability(0xE0), TypeCAbility::Max3000Ma);
}

#[test]
fn gauge_led_patterns() {
    assert_eq!(GaugeLevel::from_raw(0x00), GaugeLevel::Off);
    assert_eq!(GaugeLevel::from_raw(0x01), GaugeLevel::LowFlash);
    assert_eq!(GaugeLevel::from_raw(0x03), GaugeLevel::Leds1);
    assert_eq!(GaugeLevel::from_raw(0x07), GaugeLevel::Leds2);
    assert_eq!(GaugeLevel::from_raw(0x0F), GaugeLevel::Leds3);
    assert_eq!(GaugeLevel::from_raw(0x1F), GaugeLevel::Leds4);
    assert_eq!(GaugeLevel::from_raw(0x05), GaugeLevel::Unknown);

    assert_eq!(GaugeLevel::Leds4.percent(), Some(100));
    assert_eq!(GaugeLevel::LowFlash.percent(), Some(5));
    assert_eq!(GaugeLevel::Unknown.percent(), None);
}

#[test]
fn shutdown_voltage_codes_round_trip() {
    let codes = [
        (ShutdownVoltage::V2_73To2_81, 0x00),
        (ShutdownVoltage::V2_81To2_89, 0x10),
        (ShutdownVoltage::V2_90To3_00, 0x20),
        (ShutdownVoltage::V3_00To3_10, 0x30),
    ];
    for (threshold, code) in codes {
        assert_eq!(threshold.code(), code);
        assert_eq!(ShutdownVoltage::from_code(code), Some(threshold));
    }
    assert_eq!(ShutdownVoltage::from_code(0x15), None);
}
