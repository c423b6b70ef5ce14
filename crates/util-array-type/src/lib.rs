// SPDX-License-Identifier: MIT

//! Macros for defining fixed-size newtypes
//!
//! Two families are provided:
//!
//! * `array_type_*` for opaque byte arrays (hashes), displayed as hex,
//! * `number_type_*` for numbers stored as big-endian bytes, so that their
//!   encoding has a constant size and sorts the same way as the number.

pub use {data_encoding, rand, serde, serde_bytes};

#[macro_export]
macro_rules! array_type_define {
    (
        $(#[$outer:meta])*
        $v:vis struct $name:tt[$n:expr];
    ) => {

        $(#[$outer])*
        #[derive(PartialOrd, Ord, PartialEq, Eq, Hash)]
        $v struct $name([u8; $n]);

        impl $name {
            pub const LEN: usize = $n;
            pub const ZERO: Self = Self([0u8; $n]);

            pub const fn from_bytes(bytes: [u8; $n]) -> Self {
                Self(bytes)
            }

            pub const fn to_bytes(self) -> [u8; $n] {
                self.0
            }

            pub fn as_slice(&self) -> &[u8] {
                self.0.as_slice()
            }

            /// Convert from a slice, `None` if the length does not match
            pub fn from_slice(slice: &[u8]) -> Option<Self> {
                <[u8; $n]>::try_from(slice).ok().map(Self)
            }
        }

        impl From<[u8; $n]> for $name {
            fn from(value: [u8; $n]) -> Self {
                Self(value)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }
    }
}

/// Lowercase hex [`std::fmt::Display`], [`std::str::FromStr`] and a
/// [`std::fmt::Debug`] that matches the display
#[macro_export]
macro_rules! array_type_impl_hex_str {
    (
        $name:tt
    ) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::data_encoding::HEXLOWER.encode_write(self.as_slice(), f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                <Self as std::fmt::Display>::fmt(self, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::data_encoding::DecodeError;

            fn from_str(s: &str) -> Result<$name, Self::Err> {
                let v = $crate::data_encoding::HEXLOWER_PERMISSIVE.decode(s.as_bytes())?;
                Self::from_slice(&v).ok_or($crate::data_encoding::DecodeError {
                    position: 0,
                    kind: $crate::data_encoding::DecodeKind::Length,
                })
            }
        }
    };
}

/// Serde support: hex string in human-readable formats, raw bytes otherwise
#[macro_export]
macro_rules! array_type_impl_serde {
    (
        $name:tt
    ) => {
        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                if s.is_human_readable() {
                    s.collect_str(self)
                } else {
                    s.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> $crate::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(d: D) -> Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                if d.is_human_readable() {
                    let str = <String as $crate::serde::Deserialize>::deserialize(d)?;
                    <Self as std::str::FromStr>::from_str(&str).map_err(|e| {
                        <D::Error as $crate::serde::de::Error>::custom(format!(
                            "Invalid {}: {e}",
                            stringify!($name)
                        ))
                    })
                } else {
                    let bytes = <$crate::serde_bytes::ByteArray<{ $name::LEN }> as $crate::serde::Deserialize>::deserialize(d)?;
                    Ok(Self(bytes.into_array()))
                }
            }
        }
    };
}

#[macro_export]
macro_rules! array_type_impl_rand {
    (
        $name:tt
    ) => {
        impl $crate::rand::distributions::Distribution<$name>
            for $crate::rand::distributions::Standard
        {
            fn sample<R: $crate::rand::Rng + ?Sized>(&self, rng: &mut R) -> $name {
                $name(rng.r#gen())
            }
        }
    };
}

/// Number newtype stored as big-endian bytes
#[macro_export]
macro_rules! number_type_define {
    (
        $(#[$outer:meta])*
        $v:vis struct $name:ident($t:ty);
    ) => {

        $(#[$outer])*
        #[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Default)]
        $v struct $name([u8; std::mem::size_of::<$t>()]);

        impl $name {
            pub const ZERO: Self = Self::new(0);
            pub const MAX: Self = Self::new(<$t>::MAX);

            pub const fn new(t: $t) -> Self {
                Self(t.to_be_bytes())
            }

            pub const fn to_number(self) -> $t {
                <$t>::from_be_bytes(self.0)
            }

            pub const fn is_zero(self) -> bool {
                self.to_number() == 0
            }

            pub fn next(self) -> Option<Self> {
                self.checked_add(1)
            }

            pub fn prev(self) -> Option<Self> {
                self.checked_sub(1)
            }

            pub fn checked_add(self, rhs: $t) -> Option<Self> {
                self.to_number().checked_add(rhs).map(Self::new)
            }

            pub fn checked_sub(self, rhs: $t) -> Option<Self> {
                self.to_number().checked_sub(rhs).map(Self::new)
            }
        }

        impl From<$t> for $name {
            fn from(value: $t) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for $t {
            fn from(value: $name) -> Self {
                value.to_number()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.to_number(), f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_fmt(format_args!("{}({})", stringify!($name), self.to_number()))
            }
        }
    };
}

/// Serde support for [`number_type_define`] types: plain numbers
#[macro_export]
macro_rules! number_type_impl_serde {
    (
        $name:tt
    ) => {
        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                $crate::serde::Serialize::serialize(&self.to_number(), serializer)
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                Ok(Self::new($crate::serde::Deserialize::deserialize(
                    deserializer,
                )?))
            }
        }
    };
}
