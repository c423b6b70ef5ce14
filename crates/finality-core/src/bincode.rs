use bincode::config;

pub const STANDARD_LIMIT_16M: usize = 0x100_0000;

/// Config used for encoding everything voting related
///
/// Big endian and fixed int encoding, so that encoded [`crate::block::HeightHashPair`]s
/// have a constant size and sort like the values themselves.
pub const FINALITY_BINCODE_CONFIG: config::Configuration<
    config::BigEndian,
    config::Fixint,
    config::Limit<STANDARD_LIMIT_16M>,
> = config::standard()
    .with_limit::<STANDARD_LIMIT_16M>()
    .with_big_endian()
    .with_fixed_int_encoding();
