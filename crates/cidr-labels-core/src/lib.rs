pub mod cache;
pub mod codec;
pub mod error;
pub mod expand;
pub mod labels;
pub mod option;
pub mod prefix;

pub use codec::{label_for_masked, label_for_prefix, parse_label, parse_prefix};
pub use error::{CidrError, ParseError, PrefixLenError};
pub use expand::{cidr_labels, purge_cache, CidrLabeler};
pub use labels::{Label, LabelSource, Labels};
pub use option::DualStack;
pub use prefix::Prefix;
