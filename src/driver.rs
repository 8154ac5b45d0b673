//! Blocking driver for the IP5328P.
//! Frames single-byte register access over any [`embedded_hal::i2c::I2c`]
//! bus (hardware peripheral or [`crate::SoftI2c`]) and decodes the ADC and
//! status registers into physical readings.

use crate::data_types::{
    BoostStatus, ChargeRail, ChargeStatus, ChargingStatus, GaugeLevel, Health, InputStatus,
    NtcStatus, NtcZone, PortReading, PortReadings, ShutdownVoltage, SystemStatus,
    TelemetrySnapshot, TypeCAbility, TypeCAttach,
};
use crate::error::Error;
use crate::registers::{
    addr, boost_rail_mv, decode_battery_current_ma, decode_battery_mv, decode_boost_status,
    decode_charge_status, decode_input_status, decode_ntc_status, decode_port_current_ma,
    decode_power_mw, decode_sys_status, decode_typec_ability, decode_typec_attach,
    impute_port_current, input_rail_mv, ChgDigCtl3Bits, DEFAULT_I2C_ADDRESS,
    FastChargeProtoBits, IDLE_POWER_MW, MosOnBits, QcEnableBits, RAIL_5V_MV, RAW16_NOT_READY,
    RAW8_NOT_READY, StandbyCtlBits,
};

/// IP5328P device driver. Owns the bus handle for the device's lifetime.
pub struct Ip5328p<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ip5328p<I2C> {
    /// Create a driver instance at the default address (0x75, wire bytes
    /// 0xEA/0xEB).
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a driver instance at a board-specific 7-bit address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus handle.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Ip5328p<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Write a single register.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Error::I2c)
    }

    /// Read a single register (register pointer write, repeated start,
    /// one-byte read).
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    /// Update masked bits in a register (read-modify-write).
    pub fn update_register(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_register(reg)?;
        let new = (cur & !mask) | (value & mask);
        self.write_register(reg, new)
    }

    /// Read a 16-bit ADC composite as two single-byte reads, low byte first.
    fn read_u16(&mut self, lo: u8, hi: u8) -> Result<u16, Error<I2C::Error>> {
        let low = self.read_register(lo)?;
        let high = self.read_register(hi)?;
        Ok(u16::from(high) << 8 | u16::from(low))
    }

    /// Read a 16-bit composite, failing with [`Error::NotReady`] on the
    /// power-up pattern.
    fn read_adc(&mut self, lo: u8, hi: u8) -> Result<u16, Error<I2C::Error>> {
        let raw = self.read_u16(lo, hi)?;
        if raw == RAW16_NOT_READY {
            return Err(Error::NotReady);
        }
        Ok(raw)
    }

    /// Read a status register, failing with [`Error::NotReady`] on the
    /// power-up pattern.
    fn read_status_reg(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(reg)?;
        if raw == RAW8_NOT_READY {
            return Err(Error::NotReady);
        }
        Ok(raw)
    }

    /// Whether the chip has been activated and answers with real data.
    pub fn is_ready(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_register(addr::SYS_STATUS)? != RAW8_NOT_READY)
    }

    /// Battery terminal voltage in millivolts.
    pub fn battery_voltage_mv(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::BATVADC_DAT0, addr::BATVADC_DAT1)?;
        Ok(decode_battery_mv(raw))
    }

    /// Open-circuit battery voltage (terminal voltage compensated for cell
    /// resistance and current), in millivolts.
    pub fn battery_ocv_mv(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::BATOCV_DAT0, addr::BATOCV_DAT1)?;
        Ok(decode_battery_mv(raw))
    }

    /// Battery charge/discharge current magnitude in milliamps.
    pub fn battery_current_ma(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::BATIADC_DAT0, addr::BATIADC_DAT1)?;
        Ok(decode_battery_current_ma(raw))
    }

    /// Total input/output power in milliwatts.
    pub fn power_mw(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::POWER_DAT0, addr::POWER_DAT1)?;
        Ok(decode_power_mw(raw))
    }

    /// Current through the VIN path MOS in milliamps. The per-port ADC only
    /// runs under multi-port load; see [`Self::read_snapshot`] for the
    /// power-based correction.
    pub fn vin_current_ma(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::VINIADC_DAT0, addr::VINIADC_DAT1)?;
        Ok(decode_port_current_ma(raw))
    }

    /// Current through the VBUS (Type-C) path MOS in milliamps.
    pub fn typec_current_ma(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::VBUSIADC_DAT0, addr::VBUSIADC_DAT1)?;
        Ok(decode_port_current_ma(raw))
    }

    /// Current through the OUT1 path MOS in milliamps.
    pub fn out1_current_ma(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::VOUT1IADC_DAT0, addr::VOUT1IADC_DAT1)?;
        Ok(decode_port_current_ma(raw))
    }

    /// Current through the OUT2 path MOS in milliamps.
    pub fn out2_current_ma(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw = self.read_adc(addr::VOUT2IADC_DAT0, addr::VOUT2IADC_DAT1)?;
        Ok(decode_port_current_ma(raw))
    }

    /// Decoded SYS_STATUS register.
    pub fn sys_status(&mut self) -> Result<SystemStatus, Error<I2C::Error>> {
        Ok(decode_sys_status(self.read_status_reg(addr::SYS_STATUS)?))
    }

    /// Decoded CHG_STATUS register.
    pub fn charge_status(&mut self) -> Result<ChargeStatus, Error<I2C::Error>> {
        Ok(decode_charge_status(self.read_status_reg(addr::CHG_STATUS)?))
    }

    /// Input rail voltages (VIN, Type-C) in millivolts, from the
    /// VIN_VBUS_STATE codes. Reports the configured rail even while the
    /// matching MOS is closed.
    pub fn input_rails_mv(&mut self) -> Result<(u32, u32), Error<I2C::Error>> {
        let rails = self.read_status_reg(addr::VIN_VBUS_STATE)?;
        Ok((
            input_rail_mv(rails & 0x07),
            input_rail_mv((rails >> 3) & 0x07),
        ))
    }

    /// Decoded KEY_IN register: input-valid flags and the on/off key.
    pub fn input_status(&mut self) -> Result<InputStatus, Error<I2C::Error>> {
        Ok(decode_input_status(self.read_status_reg(addr::KEY_IN)?))
    }

    /// Decoded NTC_FLAG register.
    pub fn ntc_status(&mut self) -> Result<NtcStatus, Error<I2C::Error>> {
        Ok(decode_ntc_status(self.read_status_reg(addr::NTC_FLAG)?))
    }

    /// Decoded BST_V_FLAG register.
    pub fn boost_status(&mut self) -> Result<BoostStatus, Error<I2C::Error>> {
        Ok(decode_boost_status(self.read_status_reg(addr::BST_V_FLAG)?))
    }

    /// Type-C attach state.
    pub fn typec_attach(&mut self) -> Result<TypeCAttach, Error<I2C::Error>> {
        Ok(decode_typec_attach(self.read_status_reg(addr::TYPEC_OK)?))
    }

    /// Advertised capability of an attached Type-C source.
    pub fn typec_ability(&mut self) -> Result<TypeCAbility, Error<I2C::Error>> {
        Ok(decode_typec_ability(self.read_status_reg(addr::TYPEC_ABILITY)?))
    }

    /// Charge-level LED pattern.
    pub fn gauge_level(&mut self) -> Result<GaugeLevel, Error<I2C::Error>> {
        Ok(GaugeLevel::from_raw(self.read_status_reg(addr::LED_STATUS)?))
    }

    /// MOS (power-path switch) states.
    pub fn mos_on(&mut self) -> Result<MosOnBits, Error<I2C::Error>> {
        Ok(MosOnBits::from_bits_truncate(
            self.read_status_reg(addr::MOS_ON)?,
        ))
    }

    /// Per-port QC fast-charge enable flags.
    pub fn qc_enabled(&mut self) -> Result<QcEnableBits, Error<I2C::Error>> {
        Ok(QcEnableBits::from_bits_truncate(
            self.read_status_reg(addr::QC_EN)?,
        ))
    }

    /// Vendor fast-charge protocol enable flags (opaque to this driver).
    pub fn fast_charge_protocols(&mut self) -> Result<FastChargeProtoBits, Error<I2C::Error>> {
        Ok(FastChargeProtoBits::from_bits_truncate(
            self.read_status_reg(addr::DCP_DIG_CTL2)?,
        ))
    }

    /// Set the low-battery shutdown threshold. The closed enum carries the
    /// only four codes the chip accepts.
    pub fn set_shutdown_voltage(&mut self, threshold: ShutdownVoltage) -> Result<(), Error<I2C::Error>> {
        self.write_register(addr::VBAT_LO, threshold.code())
    }

    /// Configure standby clocks and charger-removal auto-boost (SYS_CTL14).
    pub fn set_standby_control(
        &mut self,
        auto_boost: bool,
        swclk2: bool,
        swclk1: bool,
    ) -> Result<(), Error<I2C::Error>> {
        let mut bits = StandbyCtlBits::empty();
        if auto_boost {
            bits |= StandbyCtlBits::CHG2BST;
        }
        if swclk2 {
            bits |= StandbyCtlBits::SWCLK2;
        }
        if swclk1 {
            bits |= StandbyCtlBits::SWCLK1;
        }
        self.write_register(addr::SYS_CTL14, bits.bits())
    }

    /// Enable or disable the charger stage, leaving the LED mode bits
    /// untouched.
    pub fn set_charger_enabled(&mut self, enabled: bool) -> Result<(), Error<I2C::Error>> {
        let mask = ChgDigCtl3Bits::EN_CHG.bits();
        let value = if enabled { mask } else { 0 };
        self.update_register(addr::CHG_DIG_CTL3, mask, value)
    }

    /// Write the raw charge-current limit code for one input rail. The
    /// vendor sheet documents no LSB for these, so the code is opaque.
    pub fn set_charge_current_code(&mut self, rail: ChargeRail, code: u8) -> Result<(), Error<I2C::Error>> {
        self.write_register(Self::charge_iset_reg(rail), code)
    }

    /// Read back the charge-current limit code for one input rail.
    pub fn charge_current_code(&mut self, rail: ChargeRail) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Self::charge_iset_reg(rail))
    }

    fn charge_iset_reg(rail: ChargeRail) -> u8 {
        match rail {
            ChargeRail::Vbus5v => addr::CHG_ISET_5V_VBUS,
            ChargeRail::Vin5v => addr::CHG_ISET_5V_VIN,
            ChargeRail::V7 => addr::CHG_ISET_7V,
            ChargeRail::V9 => addr::CHG_ISET_9V,
            ChargeRail::V12 => addr::CHG_ISET_12V,
        }
    }

    /// Charging state in power-supply terms.
    pub fn status(&mut self) -> Result<ChargingStatus, Error<I2C::Error>> {
        let chg = self.charge_status()?;
        Ok(if chg.full {
            ChargingStatus::Full
        } else if chg.charging {
            ChargingStatus::Charging
        } else {
            ChargingStatus::Discharging
        })
    }

    /// Battery health in power-supply terms, from the NTC zone.
    pub fn health(&mut self) -> Result<Health, Error<I2C::Error>> {
        let ntc = self.ntc_status()?;
        if !ntc.valid {
            return Ok(Health::Good);
        }
        Ok(match ntc.zone {
            NtcZone::AboveHot => Health::Overheat,
            NtcZone::BelowCold => Health::Cold,
            _ => Health::Good,
        })
    }

    /// Rough state of charge from the LED gauge, when the pattern is one of
    /// the documented ones.
    pub fn capacity_percent(&mut self) -> Result<Option<u8>, Error<I2C::Error>> {
        Ok(self.gauge_level()?.percent())
    }

    /// Read one full telemetry cycle: power, per-port enable/voltage/current
    /// and the boost range, with the cross-register corrections applied.
    ///
    /// Reads, in order: MOS_ON, POWER, VIN_VBUS_STATE, the four port current
    /// channels (Type-C, VIN, OUT1, OUT2) and BST_V_FLAG. A power-up pattern
    /// in any non-current register fails with [`Error::NotReady`]; current
    /// channels fold it to a zero magnitude.
    pub fn read_snapshot(&mut self) -> Result<TelemetrySnapshot, Error<I2C::Error>> {
        let mos = MosOnBits::from_bits_truncate(self.read_status_reg(addr::MOS_ON)?);
        let power_mw = decode_power_mw(self.read_adc(addr::POWER_DAT0, addr::POWER_DAT1)?);
        let rails = self.read_status_reg(addr::VIN_VBUS_STATE)?;

        let typec_ma =
            decode_port_current_ma(self.read_u16(addr::VBUSIADC_DAT0, addr::VBUSIADC_DAT1)?);
        let vin_ma = decode_port_current_ma(self.read_u16(addr::VINIADC_DAT0, addr::VINIADC_DAT1)?);
        let out1_ma =
            decode_port_current_ma(self.read_u16(addr::VOUT1IADC_DAT0, addr::VOUT1IADC_DAT1)?);
        let out2_ma =
            decode_port_current_ma(self.read_u16(addr::VOUT2IADC_DAT0, addr::VOUT2IADC_DAT1)?);

        let boost = decode_boost_status(self.read_status_reg(addr::BST_V_FLAG)?);

        let mut out1_on = mos.contains(MosOnBits::OUT1);
        let out2_on = mos.contains(MosOnBits::OUT2);
        let typec_on = mos.contains(MosOnBits::VBUS);
        let vin_on = mos.contains(MosOnBits::VIN);

        // The on/off key opens the OUT1 MOS even with nothing plugged in;
        // a no-load power reading, or another loaded port while OUT1 shows
        // no current, means the port is not actually in use.
        if out1_on {
            if power_mw <= IDLE_POWER_MW {
                out1_on = false;
            } else if (out2_on || typec_on || vin_on) && out1_ma == 0 {
                out1_on = false;
            }
        }

        let vin_mv = if vin_on { input_rail_mv(rails & 0x07) } else { 0 };
        let typec_mv = if typec_on {
            input_rail_mv((rails >> 3) & 0x07)
        } else {
            0
        };
        // Output ports carrying measurable current sit on the 5 V rail; an
        // open but unmeasured port runs at whatever the boost stage produces.
        let out1_mv = if out1_on {
            if out1_ma != 0 { RAIL_5V_MV } else { boost_rail_mv(boost.range) }
        } else {
            0
        };
        let out2_mv = if out2_on {
            if out2_ma != 0 { RAIL_5V_MV } else { boost_rail_mv(boost.range) }
        } else {
            0
        };

        let ports = PortReadings {
            out1: PortReading {
                enabled: out1_on,
                voltage_mv: out1_mv,
                current_ma: impute_port_current(power_mw, out1_mv, out1_ma, out1_on),
            },
            out2: PortReading {
                enabled: out2_on,
                voltage_mv: out2_mv,
                current_ma: impute_port_current(power_mw, out2_mv, out2_ma, out2_on),
            },
            type_c: PortReading {
                enabled: typec_on,
                voltage_mv: typec_mv,
                current_ma: impute_port_current(power_mw, typec_mv, typec_ma, typec_on),
            },
            vin: PortReading {
                enabled: vin_on,
                voltage_mv: vin_mv,
                current_ma: impute_port_current(power_mw, vin_mv, vin_ma, vin_on),
            },
        };

        Ok(TelemetrySnapshot {
            power_mw,
            ports,
            boost,
        })
    }
}
