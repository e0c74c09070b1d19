//! Address families, and the traits that split a prefix or an address of either family into its
//! family-specific half.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use either::{Either, Left, Right};

use crate::prefix::{BitPath, Prefix};

/// The address family of a prefix or an address. Each family has its own matching domain: a
/// prefix of one family never matches an address of the other, even if the bits coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressFamily {
    /// IPv4, 32 bits wide.
    V4,
    /// IPv6, 128 bits wide.
    V6,
}

impl AddressFamily {
    /// Number of bits of an address of this family.
    pub const fn width(self) -> u8 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// A prefix of either family, for instance, one that describes either an IPv4 or an IPv6 network.
pub trait JointPrefix: Sized {
    /// The IPv4 prefix type.
    type V4: Prefix<R = u32>;
    /// The IPv6 prefix type.
    type V6: Prefix<R = u128>;

    /// Get either `Left(V4)` or `Right(V6)`.
    fn into_either(self) -> Either<Self::V4, Self::V6>;

    /// Get either `Left(V4)` or `Right(V6)`, as a reference.
    fn as_either(&self) -> Either<&Self::V4, &Self::V6>;

    /// Construct a prefix from its IPv4 variant.
    fn from_v4(p: Self::V4) -> Self;

    /// Construct a prefix from its IPv6 variant.
    fn from_v6(p: Self::V6) -> Self;

    /// The family of this prefix.
    fn family(&self) -> AddressFamily {
        match self.as_either() {
            Left(_) => AddressFamily::V4,
            Right(_) => AddressFamily::V6,
        }
    }
}

/// A query key of either family. Any [`JointPrefix`] is also a query key, in which case a lookup
/// only walks its prefix length.
pub trait JointAddress {
    /// The IPv4 key type.
    type V4: BitPath<R = u32>;
    /// The IPv6 key type.
    type V6: BitPath<R = u128>;

    /// Get either `Left(V4)` or `Right(V6)`, as a reference.
    fn as_address(&self) -> Either<&Self::V4, &Self::V6>;

    /// The family of this key.
    fn address_family(&self) -> AddressFamily {
        match self.as_address() {
            Left(_) => AddressFamily::V4,
            Right(_) => AddressFamily::V6,
        }
    }
}

impl JointAddress for IpAddr {
    type V4 = Ipv4Addr;
    type V6 = Ipv6Addr;

    fn as_address(&self) -> Either<&Ipv4Addr, &Ipv6Addr> {
        match self {
            IpAddr::V4(a) => Left(a),
            IpAddr::V6(a) => Right(a),
        }
    }
}

/// Implement both [`JointPrefix`] and [`JointAddress`] for the enum of a prefix crate.
#[allow(unused_macros)]
macro_rules! joint_prefix {
    ($joint:ty, $v4:ty, $v6:ty, $V4:path, $V6:path) => {
        impl JointPrefix for $joint {
            type V4 = $v4;
            type V6 = $v6;

            fn into_either(self) -> Either<$v4, $v6> {
                match self {
                    $V4(p) => Left(p),
                    $V6(p) => Right(p),
                }
            }

            fn as_either(&self) -> Either<&$v4, &$v6> {
                match self {
                    $V4(p) => Left(p),
                    $V6(p) => Right(p),
                }
            }

            fn from_v4(p: $v4) -> Self {
                $V4(p)
            }

            fn from_v6(p: $v6) -> Self {
                $V6(p)
            }
        }

        impl JointAddress for $joint {
            type V4 = $v4;
            type V6 = $v6;

            fn as_address(&self) -> Either<&$v4, &$v6> {
                self.as_either()
            }
        }
    };
}

#[cfg(feature = "ipnet")]
joint_prefix!(
    ipnet::IpNet,
    ipnet::Ipv4Net,
    ipnet::Ipv6Net,
    ipnet::IpNet::V4,
    ipnet::IpNet::V6
);

#[cfg(feature = "ipnetwork")]
joint_prefix!(
    ipnetwork::IpNetwork,
    ipnetwork::Ipv4Network,
    ipnetwork::Ipv6Network,
    ipnetwork::IpNetwork::V4,
    ipnetwork::IpNetwork::V6
);

#[cfg(feature = "cidr")]
joint_prefix!(
    cidr::IpCidr,
    cidr::Ipv4Cidr,
    cidr::Ipv6Cidr,
    cidr::IpCidr::V4,
    cidr::IpCidr::V6
);
