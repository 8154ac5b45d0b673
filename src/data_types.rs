//! Data types for the IP5328P driver, decoded from the vendor register list.

/// System power mode, SYS_STATUS bits 2:0.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerMode {
    Standby,
    /// Charging from a 5 V source.
    Charge5v,
    /// One port charging while another discharges.
    SinglePortChargeDischarge,
    /// Several ports charging/discharging at once.
    MultiPortChargeDischarge,
    /// Charging through a high-voltage fast-charge handshake.
    FastChargeCharging,
    Discharge5v,
    MultiPortDischarge5v,
    FastChargeDischarge,
}

/// Decoded SYS_STATUS register (0xD1).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SystemStatus {
    /// Bit 4: 1 = charging, 0 = discharging.
    pub charging: bool,
    pub mode: PowerMode,
}

/// Charge phase, CHG_STATUS bits 2:0.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargePhase {
    Idle,
    Trickle,
    ConstantCurrent,
    ConstantVoltage,
    /// Charge-termination detection window.
    StopDetect,
    /// Battery full, charge ended.
    Done,
    Timeout,
    Reserved,
}

/// Decoded CHG_STATUS register (0xD7).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChargeStatus {
    pub charging: bool,
    pub full: bool,
    /// Combined CC/CV charge timer expired.
    pub total_timeout: bool,
    pub cv_timeout: bool,
    pub trickle_timeout: bool,
    pub phase: ChargePhase,
}

/// Decoded KEY_IN register (0xD2).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputStatus {
    /// Type-C input voltage valid (either charge or discharge direction).
    pub vbus_ok: bool,
    /// Legacy (micro-USB) input voltage valid.
    pub vin_ok: bool,
    pub key_pressed: bool,
}

/// NTC thermal zone, NTC_FLAG bits 2:0.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NtcZone {
    /// Below the cold cutoff; charging inhibited.
    BelowCold,
    Cold,
    Cool,
    Normal,
    Warm,
    Hot,
    /// Above the hot cutoff; charge/discharge inhibited.
    AboveHot,
    Reserved,
}

/// Decoded NTC_FLAG register (0xDA).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NtcStatus {
    /// The thermistor channel is connected and the zone field is meaningful.
    pub valid: bool,
    pub zone: NtcZone,
}

/// Boost converter output range, BST_V_FLAG bits 3:1.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoostRange {
    /// Boost inactive; outputs sit on the 5 V rail.
    None,
    V6To8,
    V8To10,
    V10To12,
}

/// Decoded BST_V_FLAG register (0xFB).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoostStatus {
    /// A fast-charge handshake is driving the boost stage.
    pub fast_charge: bool,
    pub range: BoostRange,
}

/// Type-C attach state from TYPEC_OK (0xB8).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeCAttach {
    Unattached,
    /// A powered device is attached; the bank is sourcing.
    DeviceAttached,
    /// An adapter is attached; the bank is sinking.
    AdapterAttached,
}

/// Advertised current capability of an attached Type-C source (0xFF).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeCAbility {
    Unknown,
    StandardUsb,
    Max1500Ma,
    Max3000Ma,
}

/// Charge-level LED pattern from LED_STATUS (0xDB).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GaugeLevel {
    /// All LEDs off; the chip is shut down.
    Off,
    /// Low-battery blink while discharging.
    LowFlash,
    Leds1,
    Leds2,
    Leds3,
    Leds4,
    /// Pattern outside the documented set.
    Unknown,
}

impl GaugeLevel {
    /// Map the raw LED pattern. Each lit LED adds one bit from the bottom.
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x1F {
            0x00 => GaugeLevel::Off,
            0x01 => GaugeLevel::LowFlash,
            0x03 => GaugeLevel::Leds1,
            0x07 => GaugeLevel::Leds2,
            0x0F => GaugeLevel::Leds3,
            0x1F => GaugeLevel::Leds4,
            _ => GaugeLevel::Unknown,
        }
    }

    /// Rough state-of-charge percentage for the LED pattern.
    pub fn percent(self) -> Option<u8> {
        match self {
            GaugeLevel::Off => Some(0),
            GaugeLevel::LowFlash => Some(5),
            GaugeLevel::Leds1 => Some(25),
            GaugeLevel::Leds2 => Some(50),
            GaugeLevel::Leds3 => Some(75),
            GaugeLevel::Leds4 => Some(100),
            GaugeLevel::Unknown => None,
        }
    }
}

/// Low-battery shutdown threshold codes for VBAT_LO (0x10). The chip
/// accepts exactly these four; the closed enum makes other codes
/// unrepresentable.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ShutdownVoltage {
    V2_73To2_81 = 0x00,
    V2_81To2_89 = 0x10,
    V2_90To3_00 = 0x20,
    V3_00To3_10 = 0x30,
}

impl ShutdownVoltage {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(ShutdownVoltage::V2_73To2_81),
            0x10 => Some(ShutdownVoltage::V2_81To2_89),
            0x20 => Some(ShutdownVoltage::V2_90To3_00),
            0x30 => Some(ShutdownVoltage::V3_00To3_10),
            _ => None,
        }
    }
}

/// Input rail selecting a CHG_ISET charge-current register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargeRail {
    Vbus5v,
    Vin5v,
    V7,
    V9,
    V12,
}

/// One output/input port of the bank.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortReading {
    /// Path MOS open and the port considered in use.
    pub enabled: bool,
    pub voltage_mv: u32,
    pub current_ma: u32,
}

/// Per-port readings of one polling cycle.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortReadings {
    pub out1: PortReading,
    pub out2: PortReading,
    pub type_c: PortReading,
    pub vin: PortReading,
}

/// Everything one polling cycle derives; recomputed from scratch each time.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TelemetrySnapshot {
    pub power_mw: u32,
    pub ports: PortReadings,
    pub boost: BoostStatus,
}

/// Charging state in power-supply terms, for hosts that map the driver
/// onto a battery framework.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargingStatus {
    Charging,
    Full,
    Discharging,
}

/// Battery health in power-supply terms, derived from the NTC zone.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Health {
    Good,
    Overheat,
    Cold,
}
