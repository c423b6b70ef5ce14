use bfin_util_array_type::{number_type_define, number_type_impl_serde};
use bincode::{Decode, Encode};

number_type_define! {
    /// Finalization epoch: a numbered group of consecutive heights
    /// sharing one committee and weight snapshot ("voting set")
    ///
    /// Epoch `1` contains only the genesis block. Epoch `0` is never valid.
    #[derive(Encode, Decode, Clone, Copy)]
    pub struct FinalizationEpoch(u32);
}
number_type_impl_serde!(FinalizationEpoch);

impl FinalizationEpoch {
    pub const GENESIS: Self = Self::new(1);
}
