//! loadgrid-firewall: IPv4 admission filter.
//!
//! Decides whether a request's origin may enter the balancer queue.
//! Rules are either exact addresses (`192.168.1.5`) or CIDR ranges
//! (`10.0.0.0/8`). Both are parsed once at construction; a lookup is a
//! hash probe plus one mask-and-compare per range.
//!
//! ```text
//! blocked(addr) = addr ∈ exact
//!              || ∃ range: (addr & range.mask) == range.network
//! ```

pub mod error;
pub mod filter;

pub use error::{FilterError, FilterResult};
pub use filter::{AdmissionFilter, CidrRange, parse_ipv4};
