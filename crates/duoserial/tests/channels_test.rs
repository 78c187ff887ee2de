// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! End-to-end tests across both channels.
//!
//! The operator types a command on the console, it is relayed to the
//! instrument, and the reply is printed back on the console.

// Tests unwrap freely
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

use duoserial::uart::MockUart;
use duoserial::{
    Budgets, ChannelConfig, ConsoleChannel, InstrumentChannel, LineEnd, LinkError, PollCounter,
    TimeoutBudget,
};

// ============================================================================
// Helpers
// ============================================================================

fn bring_up(
    console_input: &[u8],
    instrument_input: &[u8],
) -> (
    ConsoleChannel<MockUart, PollCounter>,
    InstrumentChannel<MockUart, PollCounter>,
) {
    let console = ConsoleChannel::init(
        MockUart::with_input(console_input),
        PollCounter::new(),
        &ChannelConfig::console(),
        Budgets::uniform(TimeoutBudget::ticks(200)),
    )
    .unwrap();

    let mut instrument = InstrumentChannel::new(
        MockUart::with_input(instrument_input),
        PollCounter::new(),
        Budgets::uniform(TimeoutBudget::ticks(50)),
    );
    instrument.enable(&ChannelConfig::instrument()).unwrap();

    (console, instrument)
}

/// One relay round: line from the operator to the instrument, reply back.
fn relay(
    console: &mut ConsoleChannel<MockUart, PollCounter>,
    instrument: &mut InstrumentChannel<MockUart, PollCounter>,
) -> Result<usize, LinkError> {
    let mut line = [0u8; 32];
    let read = console.read_line(&mut line);
    if read.end != LineEnd::Complete {
        return Err(LinkError::Timeout);
    }
    instrument.send(&line[..read.len])?;
    instrument.send(b"\r")?;

    let mut reply = [0u8; 32];
    let len = instrument.receive_into(&mut reply)?;
    console.write_string(b"\r\n")?;
    console.write_string(&reply[..len])
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn operator_command_round_trip() {
    let (mut console, mut instrument) = bring_up(b"flow?\r", b"12.7 L/min");

    let sent = relay(&mut console, &mut instrument).unwrap();

    assert_eq!(sent, 10);
    assert_eq!(instrument.channel().uart().output(), b"flow?\r");
    assert_eq!(
        console.channel().uart().output(),
        b"flow?\r\r\n12.7 L/min".as_slice()
    );
}

#[test]
fn edited_command_reaches_instrument_clean() {
    let (mut console, mut instrument) = bring_up(b"flx\x08ow?\r", b"ok");

    relay(&mut console, &mut instrument).unwrap();

    assert_eq!(instrument.channel().uart().output(), b"flow?\r");
}

#[test]
fn cancelled_line_is_never_relayed() {
    let (mut console, mut instrument) = bring_up(b"reset\x18", b"");

    assert_eq!(
        relay(&mut console, &mut instrument),
        Err(LinkError::Timeout)
    );
    assert!(instrument.channel().uart().output().is_empty());
}

#[test]
fn silent_instrument_does_not_hang_the_console() {
    let (mut console, mut instrument) = bring_up(b"ping\r", b"");

    assert_eq!(
        relay(&mut console, &mut instrument),
        Err(LinkError::Timeout)
    );
    // The console is still usable afterwards.
    assert_eq!(console.write_string(b"!"), Ok(1));
}

#[test]
fn powered_down_instrument_is_refused() {
    let (mut console, mut instrument) = bring_up(b"ping\r", b"pong");
    instrument.disable();

    assert_eq!(
        relay(&mut console, &mut instrument),
        Err(LinkError::Disabled)
    );
    assert!(instrument.channel().uart().output().is_empty());
    assert!(!instrument.channel().uart().is_powered());
}

#[test]
fn channels_do_not_share_state() {
    let (mut console, mut instrument) = bring_up(b"c", b"i");

    assert!(instrument.has_pending());
    assert_eq!(console.receive(), Ok(b'c'));
    // Draining the console leaves the instrument's byte in place.
    assert!(instrument.has_pending());
    assert_eq!(instrument.receive(), Ok(b'i'));

    assert_eq!(console.channel().uart().settings().unwrap().brg, 416);
    assert_eq!(instrument.channel().uart().settings().unwrap().brg, 207);
}
