//! RISC-V register names used by the generator.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    A0,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
}

impl Reg {
    /// Receives the returned value; never bound to a variable.
    pub const RETURN: Reg = Reg::A0;

    /// General purpose pool, in allocation order.
    pub const TEMPORARIES: [Reg; 7] =
        [Reg::T0, Reg::T1, Reg::T2, Reg::T3, Reg::T4, Reg::T5, Reg::T6];

    pub fn name(self) -> &'static str {
        match self {
            Reg::A0 => "a0",
            Reg::T0 => "t0",
            Reg::T1 => "t1",
            Reg::T2 => "t2",
            Reg::T3 => "t3",
            Reg::T4 => "t4",
            Reg::T5 => "t5",
            Reg::T6 => "t6",
        }
    }

    pub fn is_reserved(self) -> bool {
        self == Reg::RETURN
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
