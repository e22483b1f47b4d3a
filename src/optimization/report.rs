use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

/// What a gradient step did with each feature of the gradient.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Features whose weight was adjusted.
    pub updated: usize,
    /// Features skipped because their gradient was too small to square safely.
    pub underflow: usize,
    /// Features skipped because their weight is fixed.
    pub frozen: usize,
    /// Updated features whose weight became infinite.
    pub overflowed: usize,
}

impl StepReport {
    /// The amount of gradient entries this report accounts for.
    pub fn seen(&self) -> usize {
        self.updated + self.underflow + self.frozen
    }
}

impl Add for StepReport {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, rhs: Self) {
        self.updated += rhs.updated;
        self.underflow += rhs.underflow;
        self.frozen += rhs.frozen;
        self.overflowed += rhs.overflowed;
    }
}

impl Sum for StepReport {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
