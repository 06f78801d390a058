use crate::constants::MAX_HALVINGS;
use crate::params::Params;

pub const EPOCH_TABLE_SIZE: usize = MAX_HALVINGS as usize + 1;
pub type EpochStartTable = [u64; EPOCH_TABLE_SIZE];

/// Computes block subsidies and the absolute ordinal number of the first
/// satoshi issued at each block height.
///
/// Ordinals are assigned in issuance order: the coinbase of height `h` mints
/// ordinals `[first_ordinal(h), first_ordinal(h) + subsidy(h))`.
#[derive(Clone)]
pub struct SubsidySchedule {
    halving_interval: u64,
    base_subsidy: u64,

    /// Precomputed ordinal number of the first satoshi of each halving epoch
    epoch_start_ordinal: EpochStartTable,
}

impl SubsidySchedule {
    pub fn new(params: &Params) -> Self {
        let mut epoch_start_ordinal: EpochStartTable = [0; EPOCH_TABLE_SIZE];
        for epoch in 1..EPOCH_TABLE_SIZE {
            let prev_subsidy = params.base_subsidy >> (epoch - 1);
            epoch_start_ordinal[epoch] = epoch_start_ordinal[epoch - 1] + prev_subsidy * params.halving_interval;
        }
        Self { halving_interval: params.halving_interval, base_subsidy: params.base_subsidy, epoch_start_ordinal }
    }

    /// Block subsidy in satoshis at the given height
    pub fn subsidy(&self, height: u64) -> u64 {
        self.epoch_subsidy(height / self.halving_interval)
    }

    /// Absolute ordinal number of the first satoshi issued by the coinbase at
    /// the given height. Constant once the subsidy is depleted.
    pub fn first_ordinal(&self, height: u64) -> u64 {
        let epoch = height / self.halving_interval;
        if epoch >= MAX_HALVINGS {
            return self.epoch_start_ordinal[EPOCH_TABLE_SIZE - 1];
        }
        let offset_in_epoch = height - epoch * self.halving_interval;
        self.epoch_start_ordinal[epoch as usize] + offset_in_epoch * self.epoch_subsidy(epoch)
    }

    fn epoch_subsidy(&self, epoch: u64) -> u64 {
        if epoch >= MAX_HALVINGS {
            return 0;
        }
        self.base_subsidy >> epoch
    }

    /// Per-height summation of the schedule. Kept as the reference the O(1)
    /// table lookup is validated against.
    #[cfg(test)]
    pub fn naive_first_ordinal(&self, height: u64) -> u64 {
        (0..height).map(|h| self.subsidy(h)).sum()
    }
}
