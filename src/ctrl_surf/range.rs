use super::{
    notify::{Changed, StateChange},
    Error,
};

pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    max.min(min.max(value))
}

/// An integer value kept within `[min, max]`.
///
/// Any change goes through [`Bounded::renormalize`], so moving
/// one bound past the value or past the other bound drags them along.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounded {
    min: i32,
    max: i32,
    value: i32,
}

impl Bounded {
    pub fn try_new(min: i32, max: i32, value: i32) -> Result<Self, Error> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }

        Ok(Self {
            min,
            max,
            value: clamp(value, min, max),
        })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Position of the value within the range, from 0 to 1.
    ///
    /// A degenerate range always reports 0.
    pub fn fraction(&self) -> f64 {
        if self.max == self.min {
            return 0f64;
        }

        (self.value as f64 - self.min as f64) / (self.max as f64 - self.min as f64)
    }

    pub fn set_value(&mut self, value: i32) -> Vec<StateChange> {
        self.renormalize(self.min, self.max, value)
    }

    /// Sets the min, bumping the value and the max if needed.
    pub fn set_min(&mut self, min: i32) -> Vec<StateChange> {
        if min == self.min {
            return Vec::new();
        }

        let max = self.max.max(min);
        let mut changes = self.renormalize(min, max, self.value);
        // The bound which was set comes last.
        changes.sort_by_key(|change| matches!(change, StateChange::Min(_)));

        changes
    }

    /// Sets the max, lowering the value and the min if needed.
    pub fn set_max(&mut self, max: i32) -> Vec<StateChange> {
        if max == self.max {
            return Vec::new();
        }

        let min = self.min.min(max);

        self.renormalize(min, max, self.value)
    }

    pub fn set_range(&mut self, min: i32, max: i32) -> Result<Vec<StateChange>, Error> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }

        Ok(self.renormalize(min, max, self.value))
    }

    /// Applies the new bounds and value at once, clamping the value.
    ///
    /// Changes are listed as value first, then min, then max.
    fn renormalize(&mut self, min: i32, max: i32, value: i32) -> Vec<StateChange> {
        debug_assert!(min <= max);

        let value = clamp(value, min, max);

        let mut changes = Vec::new();
        if let Some(changed) = Changed::new(self.value, value) {
            changes.push(StateChange::Value(changed));
        }
        if let Some(changed) = Changed::new(self.min, min) {
            changes.push(StateChange::Min(changed));
        }
        if let Some(changed) = Changed::new(self.max, max) {
            changes.push(StateChange::Max(changed));
        }

        self.min = min;
        self.max = max;
        self.value = value;

        changes
    }
}
