//! Conversion between prefixes and CIDR label keys.
//!
//! Keys are the canonical text of the masked address with `:` replaced by
//! `-`, followed by `/len`. Label keys may not start or end with `-`, so a
//! `0` is added on whichever side would otherwise carry one (`::` renders
//! as `0--0`). The IPv6 encoding is one-way.

use std::net::IpAddr;

use crate::error::{CidrError, ParseError};
use crate::labels::Label;
use crate::prefix::Prefix;

/// Build the CIDR label for an already-masked address and its length.
#[must_use]
pub fn label_for_masked(addr: IpAddr, len: u8) -> Label {
    let text = addr.to_string();
    let needs_pre = text.starts_with(':');
    let needs_post = text.ends_with(':');

    let mut key = String::with_capacity(
        usize::from(needs_pre) + text.len() + usize::from(needs_post) + 1 + 3,
    );
    if needs_pre {
        key.push('0');
    }
    key.extend(text.chars().map(|c| if c == ':' { '-' } else { c }));
    if needs_post {
        key.push('0');
    }
    key.push('/');
    key.push_str(&len.to_string());

    Label::cidr(key)
}

/// The label for a prefix, masking it first.
#[must_use]
pub fn label_for_prefix(prefix: Prefix) -> Label {
    let masked = prefix.masked();
    label_for_masked(masked.addr(), masked.bits())
}

/// Parse an address or `address/length` into a CIDR label.
///
/// A bare address becomes a host prefix (`/32` or `/128`). A prefix is
/// masked before it is formatted.
pub fn parse_label(text: &str) -> Result<Label, ParseError> {
    parse_prefix(text).map(label_for_prefix)
}

/// Parse an address or `address/length` into an (unmasked) prefix.
///
/// Input without a `/` must be a plain address, otherwise the error is
/// [`ParseError::NotAnAddress`]. Input with a `/` reports any problem,
/// including a bad address before the slash, as [`ParseError::NotACidr`].
pub fn parse_prefix(text: &str) -> Result<Prefix, ParseError> {
    match text.rfind('/') {
        None => text
            .parse::<IpAddr>()
            .map(Prefix::host)
            .map_err(|source| ParseError::NotAnAddress {
                input: text.to_owned(),
                source,
            }),
        Some(slash) => parse_cidr(&text[..slash], &text[slash + 1..]).map_err(|reason| {
            ParseError::NotACidr {
                input: text.to_owned(),
                reason,
            }
        }),
    }
}

fn parse_cidr(addr: &str, len: &str) -> Result<Prefix, CidrError> {
    let addr: IpAddr = addr.parse()?;
    let len = parse_prefix_len(len)?;
    Ok(Prefix::new(addr, len)?)
}

/// Plain decimal only: no sign, no whitespace, no leading zeros.
fn parse_prefix_len(text: &str) -> Result<u8, CidrError> {
    let malformed = || CidrError::MalformedLength(text.to_owned());
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if text.len() > 1 && text.starts_with('0') {
        return Err(malformed());
    }
    text.parse::<u8>().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrefixLenError;
    use crate::labels::LabelSource;

    fn ip(s: &str) -> IpAddr {
        s.parse().expect("valid test address")
    }

    #[test]
    fn formats_ipv4_keys() {
        let label = label_for_masked(ip("10.0.0.0"), 8);
        assert_eq!(label.key(), "10.0.0.0/8");
        assert_eq!(label.source, LabelSource::Cidr);
        assert_eq!(label_for_masked(ip("0.0.0.0"), 0).key(), "0.0.0.0/0");
    }

    #[test]
    fn formats_ipv6_keys_with_hyphens() {
        assert_eq!(
            label_for_masked(ip("2001:db8::1"), 128).key(),
            "2001-db8--1/128"
        );
        assert_eq!(label_for_masked(ip("::1"), 128).key(), "0--1/128");
        assert_eq!(label_for_masked(ip("2001:db8::"), 32).key(), "2001-db8--0/32");
        assert_eq!(
            label_for_masked(ip("fe80:0:0:1::"), 64).key(),
            "fe80-0-0-1--0/64"
        );
    }

    #[test]
    fn all_zero_ipv6_gets_both_guards() {
        assert_eq!(label_for_masked(ip("::"), 0).key(), "0--0/0");
    }

    #[test]
    fn ipv4_mapped_keeps_dotted_tail() {
        assert_eq!(
            label_for_masked(ip("::ffff:10.0.0.1"), 128).key(),
            "0--ffff-10.0.0.1/128"
        );
    }

    #[test]
    fn parses_host_addresses() {
        let label = parse_label("10.0.0.1").expect("host address");
        assert_eq!(label.key(), "10.0.0.1/32");
        assert_eq!(label.source, LabelSource::Cidr);
        assert_eq!(
            parse_label("2001:DB8::1").expect("host v6").key(),
            "2001-db8--1/128"
        );
    }

    #[test]
    fn parses_and_masks_prefixes() {
        assert_eq!(parse_label("10.0.0.0/8").expect("cidr").key(), "10.0.0.0/8");
        assert_eq!(parse_label("10.1.2.3/8").expect("cidr").key(), "10.0.0.0/8");
        assert_eq!(parse_label("10.1.2.3/0").expect("cidr").key(), "0.0.0.0/0");
        assert_eq!(
            parse_label("2001:db8::1/32").expect("cidr").key(),
            "2001-db8--0/32"
        );
    }

    #[test]
    fn parse_prefix_keeps_host_bits() {
        let prefix = parse_prefix("10.1.2.3/8").expect("cidr");
        assert_eq!(prefix.addr(), ip("10.1.2.3"));
        assert_eq!(prefix.bits(), 8);
        assert_eq!("10.1.2.3/8".parse::<Prefix>(), Ok(prefix));
    }

    #[test]
    fn rejects_non_addresses() {
        let err = parse_label("foo").expect_err("not an address");
        assert!(matches!(err, ParseError::NotAnAddress { .. }));
        assert_eq!(err.input(), "foo");
        assert!(err.to_string().starts_with("\"foo\" is not an IP address: "));

        assert!(matches!(
            parse_label(""),
            Err(ParseError::NotAnAddress { .. })
        ));
    }

    #[test]
    fn rejects_ipv6_zone_ids() {
        let err = parse_label("fe80::1%eth0").expect_err("zones are not addresses");
        assert!(matches!(err, ParseError::NotAnAddress { .. }));
        assert_eq!(err.input(), "fe80::1%eth0");

        assert!(matches!(
            parse_label("fe80::%eth0/64"),
            Err(ParseError::NotACidr { .. })
        ));
    }

    #[test]
    fn rejects_bad_cidrs() {
        let err = parse_label("10.0.0.0/40").expect_err("length out of range");
        assert_eq!(
            err,
            ParseError::NotACidr {
                input: "10.0.0.0/40".to_owned(),
                reason: CidrError::Length(PrefixLenError { len: 40, max: 32 }),
            }
        );
        assert_eq!(
            err.to_string(),
            "\"10.0.0.0/40\" is not a CIDR: prefix length 40 exceeds 32"
        );

        for bad in [
            "10.0.0.0/",
            "10.0.0.0/08",
            "10.0.0.0/+8",
            "10.0.0.0/-1",
            "10.0.0.0/ 8",
            "10.0.0.0/300",
            "10.0.0.0/8/8",
            "foo/8",
            "/8",
            "::/129",
        ] {
            assert!(
                matches!(parse_label(bad), Err(ParseError::NotACidr { .. })),
                "{bad} should be rejected as a CIDR"
            );
        }
    }
}
