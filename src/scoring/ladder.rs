/// Comparison a ladder step applies to the input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Breakpoint {
    AtMost(f64),
    AtLeast(f64),
}

impl Breakpoint {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Breakpoint::AtMost(n) => value <= *n,
            Breakpoint::AtLeast(n) => value >= *n,
        }
    }
}

/// Ordered threshold table. The first matching step wins; `fallback` applies
/// when no step matches.
#[derive(Debug, Clone, Copy)]
pub struct Ladder<T: 'static> {
    pub steps: &'static [(Breakpoint, T)],
    pub fallback: T,
}

impl<T: Copy + 'static> Ladder<T> {
    pub fn lookup(&self, value: f64) -> T {
        self.steps
            .iter()
            .find(|(bp, _)| bp.matches(value))
            .map(|(_, out)| *out)
            .unwrap_or(self.fallback)
    }
}

/// Price/reference ratio to price score. Cheaper relative to market scores higher.
pub const PRICE_RATIO: Ladder<f64> = Ladder {
    steps: &[
        (Breakpoint::AtMost(0.5), 25.0),
        (Breakpoint::AtMost(0.7), 22.0),
        (Breakpoint::AtMost(0.9), 18.0),
        (Breakpoint::AtMost(1.1), 15.0),
        (Breakpoint::AtMost(1.3), 10.0),
    ],
    fallback: 5.0,
};

/// Weighted engagement to interest points (0-10).
pub const ENGAGEMENT: Ladder<f64> = Ladder {
    steps: &[
        (Breakpoint::AtLeast(20.0), 10.0),
        (Breakpoint::AtLeast(10.0), 7.0),
        (Breakpoint::AtLeast(5.0), 5.0),
        (Breakpoint::AtLeast(2.0), 3.0),
    ],
    fallback: 0.0,
};
