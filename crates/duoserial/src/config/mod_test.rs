// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for channel configuration.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn console_preset_registers() {
    let settings = ChannelConfig::console().register_settings().unwrap();
    assert_eq!(settings.brg, 416);
    assert_eq!(settings.mode.bits(), 0x8088);
    assert_eq!(settings.status.bits(), 0x0400);
}

#[test]
fn instrument_preset_registers() {
    let settings = ChannelConfig::instrument().register_settings().unwrap();
    assert_eq!(settings.brg, 207);
    assert_eq!(settings.mode.bits(), 0x800A);
    assert_eq!(settings.status, StatusBits::UTXEN);
}

#[test]
fn flow_control_selects_rts_cts() {
    let config = ChannelConfig {
        flow_control: true,
        ..ChannelConfig::console()
    };
    assert_eq!(config.mode_bits().bits(), 0x8288);
}

#[test]
fn stop_in_idle_sets_usidl() {
    let config = ChannelConfig {
        stop_in_idle: true,
        ..ChannelConfig::instrument()
    };
    assert_eq!(config.mode_bits().bits(), 0xA00A);
}

#[test]
fn odd_parity_and_two_stop_bits() {
    let config = ChannelConfig {
        parity: Parity::Odd,
        stop_bits: StopBits::Two,
        wake_on_start: false,
        ..ChannelConfig::console()
    };
    let mode = config.mode_bits();
    assert!(mode.contains(ModeBits::PDSEL1 | ModeBits::STSEL));
    assert!(!mode.contains(ModeBits::PDSEL0));
}

#[test]
fn divisor_for_115200() {
    let config = ChannelConfig {
        baud: 115_200,
        ..ChannelConfig::console()
    };
    assert_eq!(config.brg(), Ok(34));
}

#[test]
fn effective_baud_is_close_to_requested() {
    assert_eq!(ChannelConfig::console().effective_baud(), Ok(9_592));
    assert_eq!(ChannelConfig::instrument().effective_baud(), Ok(19_230));
}

#[test]
fn zero_baud_is_rejected() {
    let config = ChannelConfig {
        baud: 0,
        ..ChannelConfig::console()
    };
    assert_eq!(config.brg(), Err(ConfigError::ZeroBaud));
    assert_eq!(config.register_settings(), Err(ConfigError::ZeroBaud));
}

#[test]
fn slow_baud_overflows_divisor() {
    let config = ChannelConfig {
        baud: 50,
        ..ChannelConfig::console()
    };
    assert_eq!(config.brg(), Err(ConfigError::DivisorOverflow));
}

#[test]
fn baud_above_clock_is_rejected() {
    let config = ChannelConfig {
        baud: 10_000_000,
        ..ChannelConfig::console()
    };
    assert_eq!(config.brg(), Err(ConfigError::BaudTooHigh));
}

#[test]
fn default_is_console() {
    assert_eq!(ChannelConfig::default(), ChannelConfig::console());
}

#[test]
fn config_error_display() {
    assert_eq!(
        format!("{}", ConfigError::DivisorOverflow),
        "baud rate divisor does not fit in 16 bits"
    );
}
