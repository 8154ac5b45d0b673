//! Register map, bitfields and raw-value conversions for the IP5328P.
//! Addresses, scales and truth tables follow the vendor register list
//! (IP5328P with reg, V1.0).

/// Default 7-bit I2C address. On the wire the chip answers to 0xEA for
/// writes and 0xEB for reads; some board revisions strap a different
/// address, see [`crate::Ip5328p::with_address`].
pub const DEFAULT_I2C_ADDRESS: u8 = 0x75;

/// Value an 8-bit register reads back before the chip has been activated
/// (battery inserted / key pressed). Carries no data.
pub const RAW8_NOT_READY: u8 = 0xFF;
/// Power-up pattern for a 16-bit ADC composite.
pub const RAW16_NOT_READY: u16 = 0xFFFF;

/// Register addresses (8-bit offsets).
pub mod addr {
    /// Low-battery shutdown threshold; accepts only the four codes in
    /// [`crate::data_types::ShutdownVoltage`].
    pub const VBAT_LO: u8 = 0x10;
    /// Standby clock / charger-removal auto-boost control.
    pub const SYS_CTL14: u8 = 0x0E;
    /// Per-port QC fast-charge enable flags.
    pub const QC_EN: u8 = 0x3E;
    /// Vendor fast-charge protocol enables (QC/FCP/AFC/SFCP/PE).
    pub const DCP_DIG_CTL2: u8 = 0xA2;
    /// Charger enable lives in bit 1.
    pub const CHG_DIG_CTL3: u8 = 0x58;

    /// Charge current limit codes, one register per input rail.
    pub const CHG_ISET_9V: u8 = 0x26;
    pub const CHG_ISET_12V: u8 = 0x27;
    pub const CHG_ISET_5V_VBUS: u8 = 0x29;
    pub const CHG_ISET_5V_VIN: u8 = 0x2A;
    pub const CHG_ISET_7V: u8 = 0x2B;

    /// Battery terminal voltage ADC, low/high byte.
    pub const BATVADC_DAT0: u8 = 0x64;
    pub const BATVADC_DAT1: u8 = 0x65;
    /// Battery current ADC (bidirectional, folded encoding).
    pub const BATIADC_DAT0: u8 = 0x66;
    pub const BATIADC_DAT1: u8 = 0x67;
    /// Current through the VIN path MOS.
    pub const VINIADC_DAT0: u8 = 0x6C;
    pub const VINIADC_DAT1: u8 = 0x6D;
    /// Current through the VBUS (Type-C) path MOS.
    pub const VBUSIADC_DAT0: u8 = 0x6E;
    pub const VBUSIADC_DAT1: u8 = 0x6F;
    /// Current through the OUT1 path MOS.
    pub const VOUT1IADC_DAT0: u8 = 0x70;
    pub const VOUT1IADC_DAT1: u8 = 0x71;
    /// Current through the OUT2 path MOS.
    pub const VOUT2IADC_DAT0: u8 = 0x72;
    pub const VOUT2IADC_DAT1: u8 = 0x73;
    /// Battery voltage compensated for cell resistance and current.
    pub const BATOCV_DAT0: u8 = 0x7A;
    pub const BATOCV_DAT1: u8 = 0x7B;
    /// Total input/output power.
    pub const POWER_DAT0: u8 = 0x7C;
    pub const POWER_DAT1: u8 = 0x7D;

    /// System state: charge/discharge flag + 3-bit mode.
    pub const SYS_STATUS: u8 = 0xD1;
    /// Input-voltage-valid flags and the on/off key level.
    pub const KEY_IN: u8 = 0xD2;
    /// VIN and Type-C input rail voltage codes.
    pub const VIN_VBUS_STATE: u8 = 0xD5;
    /// Charge phase and charge-timer flags.
    pub const CHG_STATUS: u8 = 0xD7;
    /// NTC validity and thermal zone.
    pub const NTC_FLAG: u8 = 0xDA;
    /// Charge-level LED pattern.
    pub const LED_STATUS: u8 = 0xDB;
    /// MOS (power path switch) open/close states.
    pub const MOS_ON: u8 = 0xE5;
    /// Boost converter output range flags.
    pub const BST_V_FLAG: u8 = 0xFB;
    /// Type-C attach state.
    pub const TYPEC_OK: u8 = 0xB8;
    /// Advertised source capability of an attached Type-C adapter.
    pub const TYPEC_ABILITY: u8 = 0xFF;
}

use crate::data_types::{
    BoostRange, BoostStatus, ChargePhase, ChargeStatus, InputStatus, NtcStatus, NtcZone,
    PowerMode, SystemStatus, TypeCAbility, TypeCAttach,
};

/// Battery/OCV channels: 0.26855 mV per LSB above a 2.6 V floor.
pub const VBAT_SCALE_NUM: u64 = 26_855;
pub const VBAT_SCALE_DEN: u64 = 100_000;
pub const VBAT_OFFSET_MV: u32 = 2_600;

/// Battery current channel: 1.27883 mA per LSB.
pub const IBAT_SCALE_NUM: u64 = 127_883;
pub const IBAT_SCALE_DEN: u64 = 100_000;

/// Port current channels (VIN/VBUS/OUT1/OUT2): 0.6394 mA per LSB.
pub const IPORT_SCALE_NUM: u64 = 6_394;
pub const IPORT_SCALE_DEN: u64 = 10_000;

/// Power channel: 8.44 mW per LSB.
pub const POWER_SCALE_NUM: u64 = 844;
pub const POWER_SCALE_DEN: u64 = 100;

/// Nominal non-boosted output rail.
pub const RAIL_5V_MV: u32 = 5_000;

/// Total power at or below which an open OUT1 MOS is treated as unloaded
/// (the on/off key opens OUT1 even with nothing plugged in).
pub const IDLE_POWER_MW: u32 = 200;

bitflags::bitflags! {
    /// MOS_ON register bits (0xE5): which power-path switches are open.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MosOnBits: u8 {
        const OUT1 = 1 << 0;
        const OUT2 = 1 << 1;
        /// VBUS (Type-C) path MOS.
        const VBUS = 1 << 2;
        /// VIN (legacy USB input) path MOS.
        const VIN = 1 << 4;
        /// Type-C input voltage valid.
        const VBUS_VALID = 1 << 5;
        /// VIN input voltage valid.
        const VIN_VALID = 1 << 6;
        /// 0 = charging from VIN, 1 = charging from Type-C.
        const CHARGE_FROM_TYPEC = 1 << 7;
    }

    /// KEY_IN register bits (0xD2).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct KeyInBits: u8 {
        /// On/off key level; the key is active low.
        const KEY_UP = 1 << 0;
        const VIN_OK = 1 << 4;
        const VBUS_OK = 1 << 5;
    }

    /// CHG_STATUS flag bits (0xD7), bits 7-3. Bits 2-0 hold the phase.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChgStateBits: u8 {
        const TRICKLE_TIMEOUT = 1 << 3;
        const CV_TIMEOUT = 1 << 4;
        const TOTAL_TIMEOUT = 1 << 5;
        const FULL = 1 << 6;
        const CHARGING = 1 << 7;
    }

    /// BST_V_FLAG register bits (0xFB).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BoostBits: u8 {
        const FAST_CHARGE = 1 << 0;
        const V6_TO_8 = 1 << 1;
        const V8_TO_10 = 1 << 2;
        const V10_TO_12 = 1 << 3;
    }

    /// TYPEC_OK register bits (0xB8).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TypeCOkBits: u8 {
        /// A powered device (phone etc.) is attached; the bank is discharging.
        const DEVICE_ATTACHED = 1 << 1;
        /// An adapter is attached; the bank is charging.
        const ADAPTER_ATTACHED = 1 << 5;
    }

    /// QC_EN register bits (0x3E): per-port fast-charge enables.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct QcEnableBits: u8 {
        const OUT1 = 1 << 0;
        const OUT2 = 1 << 1;
        const VIN = 1 << 2;
        const TYPEC = 1 << 3;
    }

    /// DCP_DIG_CTL2 register bits (0xA2): vendor handshake protocol enables.
    /// Read as opaque flags; the protocols themselves live in the chip.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FastChargeProtoBits: u8 {
        const QC2_SRC = 1 << 0;
        const QC3_SRC = 1 << 1;
        /// Huawei FCP source.
        const FCP_SRC = 1 << 2;
        /// Samsung AFC source.
        const AFC_SRC = 1 << 3;
        /// Spreadtrum SFCP source.
        const SFCP_SRC = 1 << 4;
        const PE11_RX = 1 << 5;
        const PE20_RX = 1 << 6;
        /// PE 1.1 maximum request: 0 = 12 V, 1 = 9 V.
        const PE11_MAX_9V = 1 << 7;
    }

    /// SYS_CTL14 register bits (0x0E).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StandbyCtlBits: u8 {
        /// Keep the I2C1 clock running in standby so registers stay readable.
        const SWCLK1 = 1 << 2;
        /// Same for the I2C2 clock.
        const SWCLK2 = 1 << 3;
        /// Start boost output automatically when the charger is removed.
        const CHG2BST = 1 << 6;
    }

    /// CHG_DIG_CTL3 register bits (0x58).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChgDigCtl3Bits: u8 {
        const EN_CHG = 1 << 1;
        const LED_MODE = 1 << 2;
    }
}

/// Fold the biased 16-bit current encoding into an unsigned magnitude.
///
/// The ADC reports bidirectional current with values above 32767 standing
/// for the opposite direction; the sign is discarded and the magnitude is
/// `65535 - raw`. This is the chip's documented encoding, not two's
/// complement.
pub fn fold_current_raw(raw: u16) -> u16 {
    if raw > 32_767 { 65_535 - raw } else { raw }
}

/// Battery terminal / OCV voltage in millivolts. The 0xFFFF power-up
/// pattern decodes to 0.
pub fn decode_battery_mv(raw: u16) -> u32 {
    if raw == RAW16_NOT_READY {
        return 0;
    }
    (u64::from(raw) * VBAT_SCALE_NUM / VBAT_SCALE_DEN) as u32 + VBAT_OFFSET_MV
}

/// Battery current magnitude in milliamps.
pub fn decode_battery_current_ma(raw: u16) -> u32 {
    (u64::from(fold_current_raw(raw)) * IBAT_SCALE_NUM / IBAT_SCALE_DEN) as u32
}

/// Port (VIN/VBUS/OUT1/OUT2) current magnitude in milliamps. Folding maps
/// the 0xFFFF power-up pattern to zero.
pub fn decode_port_current_ma(raw: u16) -> u32 {
    (u64::from(fold_current_raw(raw)) * IPORT_SCALE_NUM / IPORT_SCALE_DEN) as u32
}

/// Total input/output power in milliwatts. The 0xFFFF power-up pattern
/// decodes to 0.
pub fn decode_power_mw(raw: u16) -> u32 {
    if raw == RAW16_NOT_READY {
        return 0;
    }
    (u64::from(raw) * POWER_SCALE_NUM / POWER_SCALE_DEN) as u32
}

/// Input rail voltage from a 3-bit VIN_VBUS_STATE field. Codes outside the
/// documented set fall back to the 5 V rail.
pub fn input_rail_mv(code: u8) -> u32 {
    match code & 0x07 {
        0b111 => 12_000,
        0b011 => 9_000,
        0b001 => 7_000,
        _ => RAIL_5V_MV,
    }
}

/// Nominal output rail for a boost range, used when a port carries no
/// directly measurable current.
pub fn boost_rail_mv(range: BoostRange) -> u32 {
    match range {
        BoostRange::None => RAIL_5V_MV,
        BoostRange::V6To8 => 7_000,
        BoostRange::V8To10 => 9_000,
        BoostRange::V10To12 => 12_000,
    }
}

/// Impute a port current from total power when the direct reading is zero.
///
/// Under single-port load the per-port ADC does not start, so an enabled
/// port can carry current that only shows up in the power register. A zero
/// voltage leaves the reading untouched instead of dividing by it.
pub fn impute_port_current(power_mw: u32, voltage_mv: u32, current_ma: u32, enabled: bool) -> u32 {
    if current_ma != 0 || !enabled || power_mw == 0 || voltage_mv == 0 {
        return current_ma;
    }
    (u64::from(power_mw) * 1_000 / u64::from(voltage_mv)) as u32
}

/// Decode SYS_STATUS (0xD1): charge/discharge flag in bit 4, mode in
/// bits 2:0.
pub fn decode_sys_status(raw: u8) -> SystemStatus {
    let mode = match raw & 0x07 {
        0b000 => PowerMode::Standby,
        0b001 => PowerMode::Charge5v,
        0b010 => PowerMode::SinglePortChargeDischarge,
        0b011 => PowerMode::MultiPortChargeDischarge,
        0b100 => PowerMode::FastChargeCharging,
        0b101 => PowerMode::Discharge5v,
        0b110 => PowerMode::MultiPortDischarge5v,
        _ => PowerMode::FastChargeDischarge,
    };
    SystemStatus {
        charging: raw & (1 << 4) != 0,
        mode,
    }
}

/// Decode CHG_STATUS (0xD7): timer/full/charging flags in bits 7:3, charge
/// phase in bits 2:0.
pub fn decode_charge_status(raw: u8) -> ChargeStatus {
    let bits = ChgStateBits::from_bits_truncate(raw);
    let phase = match raw & 0x07 {
        0b000 => ChargePhase::Idle,
        0b001 => ChargePhase::Trickle,
        0b010 => ChargePhase::ConstantCurrent,
        0b011 => ChargePhase::ConstantVoltage,
        0b100 => ChargePhase::StopDetect,
        0b101 => ChargePhase::Done,
        0b110 => ChargePhase::Timeout,
        _ => ChargePhase::Reserved,
    };
    ChargeStatus {
        charging: bits.contains(ChgStateBits::CHARGING),
        full: bits.contains(ChgStateBits::FULL),
        total_timeout: bits.contains(ChgStateBits::TOTAL_TIMEOUT),
        cv_timeout: bits.contains(ChgStateBits::CV_TIMEOUT),
        trickle_timeout: bits.contains(ChgStateBits::TRICKLE_TIMEOUT),
        phase,
    }
}

/// Decode KEY_IN (0xD2). The key bit is active low.
pub fn decode_input_status(raw: u8) -> InputStatus {
    let bits = KeyInBits::from_bits_truncate(raw);
    InputStatus {
        vbus_ok: bits.contains(KeyInBits::VBUS_OK),
        vin_ok: bits.contains(KeyInBits::VIN_OK),
        key_pressed: !bits.contains(KeyInBits::KEY_UP),
    }
}

/// Decode NTC_FLAG (0xDA): validity in bit 3, thermal zone in bits 2:0.
pub fn decode_ntc_status(raw: u8) -> NtcStatus {
    let zone = match raw & 0x07 {
        0b000 => NtcZone::BelowCold,
        0b001 => NtcZone::Cold,
        0b010 => NtcZone::Cool,
        0b011 => NtcZone::Normal,
        0b100 => NtcZone::Warm,
        0b101 => NtcZone::Hot,
        0b110 => NtcZone::AboveHot,
        _ => NtcZone::Reserved,
    };
    NtcStatus {
        valid: raw & (1 << 3) != 0,
        zone,
    }
}

/// Decode BST_V_FLAG (0xFB). When several range flags are set the highest
/// range wins.
pub fn decode_boost_status(raw: u8) -> BoostStatus {
    let bits = BoostBits::from_bits_truncate(raw);
    let range = if bits.contains(BoostBits::V10_TO_12) {
        BoostRange::V10To12
    } else if bits.contains(BoostBits::V8_TO_10) {
        BoostRange::V8To10
    } else if bits.contains(BoostBits::V6_TO_8) {
        BoostRange::V6To8
    } else {
        BoostRange::None
    };
    BoostStatus {
        fast_charge: bits.contains(BoostBits::FAST_CHARGE),
        range,
    }
}

/// Decode TYPEC_OK (0xB8). An attached adapter takes precedence over an
/// attached device.
pub fn decode_typec_attach(raw: u8) -> TypeCAttach {
    let bits = TypeCOkBits::from_bits_truncate(raw);
    if bits.contains(TypeCOkBits::ADAPTER_ATTACHED) {
        TypeCAttach::AdapterAttached
    } else if bits.contains(TypeCOkBits::DEVICE_ATTACHED) {
        TypeCAttach::DeviceAttached
    } else {
        TypeCAttach::Unattached
    }
}

/// Decode the advertised Type-C source capability (0xFF). The strongest
/// advertised level wins.
pub fn decode_typec_ability(raw: u8) -> TypeCAbility {
    if raw & (1 << 7) != 0 {
        TypeCAbility::Max3000Ma
    } else if raw & (1 << 6) != 0 {
        TypeCAbility::Max1500Ma
    } else if raw & (1 << 5) != 0 {
        TypeCAbility::StandardUsb
    } else {
        TypeCAbility::Unknown
    }
}
