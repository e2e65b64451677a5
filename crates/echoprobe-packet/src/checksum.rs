//! The Internet checksum ([RFC 1071]) as used by `IPv4` and `ICMP`.
//!
//! Words are always summed as big-endian pairs of bytes, so the result does
//! not depend on the byte order of the host.
//!
//! [RFC 1071]: https://datatracker.ietf.org/doc/html/rfc1071

/// The index of the 16-bit word holding the `ICMP` checksum.
const ICMP_CHECKSUM_WORD: usize = 1;

/// The index of the 16-bit word holding the `IPv4` header checksum.
const IPV4_CHECKSUM_WORD: usize = 5;

/// Calculate the Internet checksum of a byte sequence.
///
/// An odd trailing byte is summed as if followed by a zero byte, the zero byte
/// is never part of the data.
#[must_use]
pub fn internet_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, None))
}

/// Calculate the checksum for an `ICMP` message.
///
/// The checksum field in `data` is skipped and so the result is the same as
/// if the field had been zeroed.
#[must_use]
pub fn icmp_ipv4_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, Some(ICMP_CHECKSUM_WORD)))
}

/// Calculate the checksum for an `IPv4` header.
#[must_use]
pub fn ipv4_header_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, Some(IPV4_CHECKSUM_WORD)))
}

/// Verify the checksum of a received message.
///
/// The checksum field is included in the sum as received, and the message is
/// valid if the Internet checksum over the whole message is zero.
#[must_use]
pub fn verify_checksum(data: &[u8]) -> bool {
    internet_checksum(data) == 0
}

fn sum_be_words(data: &[u8], ignore_word: Option<usize>) -> u64 {
    let mut words = data.chunks_exact(2);
    let mut sum = words
        .by_ref()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignore_word)
        .map(|(_, word)| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum::<u64>();
    if let [last] = words.remainder() {
        if Some(data.len() / 2) != ignore_word {
            sum += u64::from(*last) << 8;
        }
    }
    sum
}

/// Fold the carries back into the low 16 bits and take the complement.
///
/// The sum of `n` words is at most `n * 0xFFFF`, which cannot overflow a `u64`
/// for any slice that fits in memory.
const fn finalize_checksum(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !(sum as u16)
}
