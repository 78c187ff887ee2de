// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! PIC24FJ UART driver.
//!
//! Each UART module is a block of five consecutive 16-bit registers
//! (`UxMODE`, `UxSTA`, `UxTXREG`, `UxRXREG`, `UxBRG`). Power is gated by a
//! bit in `PMD1` (set = module off) and the RTS line is a plain port pin
//! whose TRIS bit must be cleared to make it an output.

use core::ptr::{read_volatile, write_volatile};

use super::{Uart, UartControl};
use crate::config::{RegisterSettings, StatusBits};

/// `UxMODE` word offset.
const MODE: usize = 0;

/// `UxSTA` word offset.
const STA: usize = 1;

/// `UxTXREG` word offset.
const TXREG: usize = 2;

/// `UxRXREG` word offset.
const RXREG: usize = 3;

/// `UxBRG` word offset.
const BRG: usize = 4;

/// A single bit in a 16-bit special function register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBit {
    /// Data-space address of the register.
    pub addr: usize,
    /// Bit index, 0..16.
    pub bit: u8,
}

/// Where one UART module lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartLayout {
    /// Address of `UxMODE`; the other registers follow.
    pub base: usize,
    /// Peripheral module disable bit.
    pub power: RegisterBit,
    /// TRIS bit of the RTS pin.
    pub rts_tris: RegisterBit,
}

/// UART1 on PIC24FJ256GB110: RTS on RD15.
pub const UART1: UartLayout = UartLayout {
    base: 0x0220,
    power: RegisterBit {
        addr: 0x0770,
        bit: 5,
    },
    rts_tris: RegisterBit {
        addr: 0x02D8,
        bit: 15,
    },
};

/// UART2 on PIC24FJ256GB110: RTS on RF13.
pub const UART2: UartLayout = UartLayout {
    base: 0x0230,
    power: RegisterBit {
        addr: 0x0770,
        bit: 6,
    },
    rts_tris: RegisterBit {
        addr: 0x02E8,
        bit: 13,
    },
};

/// Memory-mapped PIC24 UART.
///
/// Owns its register block exclusively; create exactly one per module.
#[derive(Debug)]
pub struct Pic24Uart {
    regs: *mut u16,
    power: *mut u16,
    power_mask: u16,
    rts_tris: *mut u16,
    rts_mask: u16,
}

impl Pic24Uart {
    /// Take ownership of the UART described by `layout`.
    ///
    /// # Safety
    ///
    /// - every address in `layout` must be a valid, 2-byte aligned register
    /// - no other code may access the UART register block while this handle
    ///   exists (the power and TRIS registers are shared and are updated with
    ///   read-modify-write, so callers must not touch them concurrently)
    #[must_use]
    pub unsafe fn new(layout: &UartLayout) -> Self {
        Self {
            regs: layout.base as *mut u16,
            power: layout.power.addr as *mut u16,
            power_mask: 1 << layout.power.bit,
            rts_tris: layout.rts_tris.addr as *mut u16,
            rts_mask: 1 << layout.rts_tris.bit,
        }
    }

    /// Read a register of the UART block.
    fn read_reg(&self, offset: usize) -> u16 {
        // SAFETY: `new` guarantees the block is valid for all five offsets.
        unsafe { read_volatile(self.regs.add(offset)) }
    }

    /// Write a register of the UART block.
    fn write_reg(&mut self, offset: usize, value: u16) {
        // SAFETY: `new` guarantees the block is valid for all five offsets.
        unsafe { write_volatile(self.regs.add(offset), value) }
    }

    /// Current `UxSTA` flags.
    fn status(&self) -> StatusBits {
        StatusBits::from_bits_retain(self.read_reg(STA))
    }

    /// Set or clear bits in a shared port/PMD register.
    ///
    /// # Safety
    ///
    /// `reg` must be a valid register address.
    unsafe fn modify_shared(reg: *mut u16, mask: u16, set: bool) {
        unsafe {
            let value = read_volatile(reg);
            let value = if set { value | mask } else { value & !mask };
            write_volatile(reg, value);
        }
    }
}

impl Uart for Pic24Uart {
    fn can_write(&self) -> bool {
        !self.status().contains(StatusBits::UTXBF)
    }

    fn can_read(&self) -> bool {
        self.status().contains(StatusBits::URXDA)
    }

    fn write_data(&mut self, byte: u8) {
        self.write_reg(TXREG, u16::from(byte));
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "8-bit frames, the ninth data bit is unused"
    )]
    fn read_data(&mut self) -> u8 {
        self.read_reg(RXREG) as u8
    }
}

impl UartControl for Pic24Uart {
    fn configure(&mut self, settings: &RegisterSettings) {
        self.write_reg(BRG, settings.brg);
        self.write_reg(MODE, settings.mode.bits());
        self.write_reg(STA, settings.status.bits());
        // SAFETY: `new` guarantees the TRIS address is valid.
        unsafe { Self::modify_shared(self.rts_tris, self.rts_mask, false) };
        tracing::debug!(
            brg = settings.brg,
            mode = settings.mode.bits(),
            "uart configured"
        );
    }

    fn set_powered(&mut self, powered: bool) {
        // PMD bit set means the module is disabled.
        // SAFETY: `new` guarantees the PMD address is valid.
        unsafe { Self::modify_shared(self.power, self.power_mask, !powered) };
    }
}
