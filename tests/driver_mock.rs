use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use ip5328p::data_types::{ChargingStatus, PortReading, ShutdownVoltage};
use ip5328p::driver::Ip5328p;
use ip5328p::Error;

const ADDR: u8 = 0x75;

#[test]
fn register_write_then_read_round_trip() {
    // An ideal bus hands back exactly what was written.
    let expectations = [
        I2cTrans::write(ADDR, vec![0x10, 0x20]),
        I2cTrans::write_read(ADDR, vec![0x10], vec![0x20]),
    ];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    driver.write_register(0x10, 0x20).unwrap();
    assert_eq!(driver.read_register(0x10).unwrap(), 0x20);
    driver.free().done();
}

#[test]
fn battery_voltage_reads_low_then_high() {
    // raw 0x2710 = 10000 -> 10000 * 0.26855 + 2600 = 5285 mV.
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x64], vec![0x10]),
        I2cTrans::write_read(ADDR, vec![0x65], vec![0x27]),
    ];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert_eq!(driver.battery_voltage_mv().unwrap(), 5_285);
    driver.free().done();
}

#[test]
fn battery_voltage_power_up_pattern_is_not_ready() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x64], vec![0xFF]),
        I2cTrans::write_read(ADDR, vec![0x65], vec![0xFF]),
    ];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert!(matches!(driver.battery_voltage_mv(), Err(Error::NotReady)));
    driver.free().done();
}

#[test]
fn charging_status_full_beats_charging() {
    // CHG_STATUS with both full and charging flags set reports Full.
    let expectations = [I2cTrans::write_read(ADDR, vec![0xD7], vec![0b1100_0101])];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert_eq!(driver.status().unwrap(), ChargingStatus::Full);
    driver.free().done();
}

#[test]
fn set_charger_enabled_preserves_other_bits() {
    // EN_CHG is bit 1; the LED mode bit 2 must survive the update.
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x58], vec![0x04]),
        I2cTrans::write(ADDR, vec![0x58, 0x06]),
    ];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    driver.set_charger_enabled(true).unwrap();
    driver.free().done();
}

#[test]
fn set_shutdown_voltage_writes_code() {
    let expectations = [I2cTrans::write(ADDR, vec![0x10, 0x30])];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    driver
        .set_shutdown_voltage(ShutdownVoltage::V3_00To3_10)
        .unwrap();
    driver.free().done();
}

#[test]
fn input_rails_decode_both_fields() {
    // 0b0011_1011: Type-C code 111 -> 12 V, VIN code 011 -> 9 V.
    let expectations = [I2cTrans::write_read(ADDR, vec![0xD5], vec![0x3B])];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert_eq!(driver.input_rails_mv().unwrap(), (9_000, 12_000));
    driver.free().done();
}

#[test]
fn capacity_from_gauge_leds() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0xDB], vec![0x0F])];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert_eq!(driver.capacity_percent().unwrap(), Some(75));
    driver.free().done();
}

/// Expectations for one full snapshot cycle, in the fixed read order:
/// MOS_ON, POWER, VIN_VBUS_STATE, Type-C/VIN/OUT1/OUT2 currents, BST_V_FLAG.
fn snapshot_expectations(
    mos: u8,
    power: u16,
    rails: u8,
    typec_ma_raw: u16,
    vin_ma_raw: u16,
    out1_ma_raw: u16,
    out2_ma_raw: u16,
    boost: u8,
) -> Vec<I2cTrans> {
    let [power_lo, power_hi] = power.to_le_bytes();
    let [typec_lo, typec_hi] = typec_ma_raw.to_le_bytes();
    let [vin_lo, vin_hi] = vin_ma_raw.to_le_bytes();
    let [out1_lo, out1_hi] = out1_ma_raw.to_le_bytes();
    let [out2_lo, out2_hi] = out2_ma_raw.to_le_bytes();
    vec![
        I2cTrans::write_read(ADDR, vec![0xE5], vec![mos]),
        I2cTrans::write_read(ADDR, vec![0x7C], vec![power_lo]),
        I2cTrans::write_read(ADDR, vec![0x7D], vec![power_hi]),
        I2cTrans::write_read(ADDR, vec![0xD5], vec![rails]),
        I2cTrans::write_read(ADDR, vec![0x6E], vec![typec_lo]),
        I2cTrans::write_read(ADDR, vec![0x6F], vec![typec_hi]),
        I2cTrans::write_read(ADDR, vec![0x6C], vec![vin_lo]),
        I2cTrans::write_read(ADDR, vec![0x6D], vec![vin_hi]),
        I2cTrans::write_read(ADDR, vec![0x70], vec![out1_lo]),
        I2cTrans::write_read(ADDR, vec![0x71], vec![out1_hi]),
        I2cTrans::write_read(ADDR, vec![0x72], vec![out2_lo]),
        I2cTrans::write_read(ADDR, vec![0x73], vec![out2_hi]),
        I2cTrans::write_read(ADDR, vec![0xFB], vec![boost]),
    ]
}

#[test]
fn snapshot_imputes_sole_port_current_from_power() {
    // OUT1 alone, power raw 1000 -> 8440 mW, no direct current anywhere.
    // The port sits on the 5 V rail, so 8440 mW / 5 V = 1688 mA.
    let expectations = snapshot_expectations(0x01, 1_000, 0x00, 0, 0, 0, 0, 0x00);
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    let snapshot = driver.read_snapshot().unwrap();
    assert_eq!(snapshot.power_mw, 8_440);
    assert_eq!(
        snapshot.ports.out1,
        PortReading {
            enabled: true,
            voltage_mv: 5_000,
            current_ma: 1_688,
        }
    );
    assert_eq!(snapshot.ports.out2, PortReading::default());
    assert_eq!(snapshot.ports.type_c, PortReading::default());
    assert_eq!(snapshot.ports.vin, PortReading::default());
    driver.free().done();
}

#[test]
fn snapshot_corrects_phantom_out1_enable() {
    // OUT1 and the Type-C MOS both open, but only Type-C carries current
    // (raw 2000 -> 1278 mA). A keypress opens OUT1 with nothing plugged in,
    // so the zero-current OUT1 is reported as disabled and unimputed.
    let expectations = snapshot_expectations(0x05, 1_000, 0x00, 2_000, 0, 0, 0, 0x00);
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    let snapshot = driver.read_snapshot().unwrap();
    assert_eq!(snapshot.ports.out1, PortReading::default());
    assert_eq!(
        snapshot.ports.type_c,
        PortReading {
            enabled: true,
            voltage_mv: 5_000,
            current_ma: 1_278,
        }
    );
    driver.free().done();
}

#[test]
fn snapshot_reports_boosted_rail_voltage() {
    // OUT2 alone with no measurable current while the boost stage runs at
    // 8-10 V: the port reports the 9 V rail and the imputed current.
    // Power raw 2000 -> 16880 mW -> 16880 / 9 V = 1875 mA.
    let expectations = snapshot_expectations(0x02, 2_000, 0x00, 0, 0, 0, 0, 0x05);
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    let snapshot = driver.read_snapshot().unwrap();
    assert!(snapshot.boost.fast_charge);
    assert_eq!(
        snapshot.ports.out2,
        PortReading {
            enabled: true,
            voltage_mv: 9_000,
            current_ma: 1_875,
        }
    );
    driver.free().done();
}

#[test]
fn snapshot_fails_not_ready_before_decoding() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0xE5], vec![0xFF])];
    let mut driver = Ip5328p::new(I2cMock::new(&expectations));
    assert!(matches!(driver.read_snapshot(), Err(Error::NotReady)));
    driver.free().done();
}
