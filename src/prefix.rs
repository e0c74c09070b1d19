//! The bit-path view over addresses and prefixes.
//!
//! [`BitPath`] is the read-only view every trie walk is driven by: a fixed-width unsigned integer
//! whose most significant bit is bit `0`, plus the number of leading bits that are significant. A
//! full address is simply a bit path whose length equals its width. [`Prefix`] adds the ability
//! to build a value back from its raw representation, which is required for anything the trie
//! returns as a matched prefix.

#[cfg(feature = "cidr")]
use cidr::{Ipv4Cidr, Ipv6Cidr};
#[cfg(feature = "ipnet")]
use ipnet::{Ipv4Net, Ipv6Net};
#[cfg(feature = "ipnetwork")]
use ipnetwork::{Ipv4Network, Ipv6Network};
use num_traits::{PrimInt, Unsigned, Zero};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Read-only view of a fixed-width bit sequence together with the number of significant leading
/// bits.
pub trait BitPath {
    /// How the bits are represented. This must be one of `u8`, `u16`, `u32`, `u64`, `u128`, or
    /// `usize`. The width of this type is the width of the address family.
    type R: Unsigned + PrimInt + Zero;

    /// Raw representation of the bits. Bits past [`BitPath::prefix_len`] may be set; they are
    /// never read by the trie.
    fn repr(&self) -> Self::R;

    /// Number of significant leading bits. For a full address, this is [`BitPath::width`].
    fn prefix_len(&self) -> u8;

    /// Number of bits of the representation.
    fn width() -> u8
    where
        Self: Sized,
    {
        width_of::<Self::R>()
    }

    /// `self.repr()` with every bit past `self.prefix_len()` cleared.
    fn mask(&self) -> Self::R {
        self.repr() & mask_from_prefix_len(self.prefix_len())
    }

    /// Check if a specific bit is set, counted from the left (bit `0` is the most significant
    /// one). `bit` must be smaller than the width.
    fn is_bit_set(&self, bit: u8) -> bool {
        bit_at(self.repr(), bit)
    }

    /// Check if `self` contains `other`, that is, if `other` is at least as long as `self` and
    /// both agree on the first `self.prefix_len()` bits.
    fn contains<B>(&self, other: &B) -> bool
    where
        B: BitPath<R = Self::R>,
    {
        self.prefix_len() <= other.prefix_len()
            && other.repr() & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }
}

/// A [`BitPath`] that can be rebuilt from its representation and length.
pub trait Prefix: BitPath + Sized {
    /// Create a new prefix from the representation and the prefix length. `repr` has all bits
    /// past `len` cleared, and `len` never exceeds the width.
    fn from_repr_len(repr: Self::R, len: u8) -> Self;
}

#[inline(always)]
pub(crate) fn width_of<R: PrimInt>() -> u8 {
    R::zero().count_zeros() as u8
}

#[inline(always)]
pub(crate) fn bit_at<R: PrimInt>(repr: R, bit: u8) -> bool {
    let width = width_of::<R>();
    debug_assert!(bit < width, "bit {bit} out of range for a width of {width}");
    (repr >> (width - 1 - bit) as usize) & R::one() == R::one()
}

/// `repr` with bit `bit` set. `bit` must be smaller than the width.
#[inline(always)]
pub(crate) fn with_bit<R: PrimInt>(repr: R, bit: u8) -> R {
    repr | (R::one() << (width_of::<R>() - 1 - bit) as usize)
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len >= width_of::<R>() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

impl BitPath for Ipv4Addr {
    type R = u32;

    fn repr(&self) -> u32 {
        u32::from(*self)
    }

    fn prefix_len(&self) -> u8 {
        32
    }

    fn mask(&self) -> u32 {
        u32::from(*self)
    }
}

impl BitPath for Ipv6Addr {
    type R = u128;

    fn repr(&self) -> u128 {
        u128::from(*self)
    }

    fn prefix_len(&self) -> u8 {
        128
    }

    fn mask(&self) -> u128 {
        u128::from(*self)
    }
}

#[cfg(feature = "ipnet")]
impl BitPath for Ipv4Net {
    type R = u32;

    fn repr(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Net::new(repr.into(), len).unwrap()
    }
}

#[cfg(feature = "ipnet")]
impl BitPath for Ipv6Net {
    type R = u128;

    fn repr(&self) -> u128 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv6Net {
    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Net::new(repr.into(), len).unwrap()
    }
}

#[cfg(feature = "ipnetwork")]
impl BitPath for Ipv4Network {
    type R = u32;

    fn repr(&self) -> u32 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv4Network {
    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Network::new(repr.into(), len).unwrap()
    }
}

#[cfg(feature = "ipnetwork")]
impl BitPath for Ipv6Network {
    type R = u128;

    fn repr(&self) -> u128 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv6Network {
    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Network::new(repr.into(), len).unwrap()
    }
}

// `cidr` rejects host bits, so its representation is always masked.
#[cfg(feature = "cidr")]
impl BitPath for Ipv4Cidr {
    type R = u32;

    fn repr(&self) -> u32 {
        self.first_address().into()
    }

    fn prefix_len(&self) -> u8 {
        self.network_length()
    }

    fn mask(&self) -> u32 {
        self.first_address().into()
    }
}

#[cfg(feature = "cidr")]
impl Prefix for Ipv4Cidr {
    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Cidr::new(repr.into(), len).unwrap()
    }
}

#[cfg(feature = "cidr")]
impl BitPath for Ipv6Cidr {
    type R = u128;

    fn repr(&self) -> u128 {
        self.first_address().into()
    }

    fn prefix_len(&self) -> u8 {
        self.network_length()
    }

    fn mask(&self) -> u128 {
        self.first_address().into()
    }
}

#[cfg(feature = "cidr")]
impl Prefix for Ipv6Cidr {
    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Cidr::new(repr.into(), len).unwrap()
    }
}

impl<R> BitPath for (R, u8)
where
    R: Unsigned + PrimInt + Zero,
{
    type R = R;

    fn repr(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt + Zero,
{
    fn from_repr_len(repr: R, len: u8) -> Self {
        (repr, len)
    }
}
