//! Hash-to-index reduction and primality utilities shared by both maps.
//!
//! Index reduction masks the 64-bit hash down to a 36-bit non-negative range
//! before taking it modulo the table capacity, so the same hashed key always
//! lands on the same index for a given capacity. The primality helpers drive
//! the probing map's next-prime growth policy.

/// Mask keeping the low 36 bits of a hash before index reduction
pub const HASH_MASK: u64 = 0xF_FFFF_FFFF;

/// Reduces a hashed key plus a probe step to a slot index.
///
/// Computes `((hashed_key & HASH_MASK) + step) % capacity`. The reduction is
/// stable: the same inputs with the same capacity always produce the same
/// index. A capacity of zero yields index zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn probe_index(hashed_key: u64, step: usize, capacity: usize) -> usize {
    let spread = (hashed_key & HASH_MASK).saturating_add(step as u64);
    match spread.checked_rem(capacity as u64) {
        Some(index) => index as usize,
        None => 0,
    }
}

/// Reduces a hashed key to a bucket index for the given capacity
#[must_use]
pub fn bucket_index(hashed_key: u64, capacity: usize) -> usize {
    probe_index(hashed_key, 0, capacity)
}

/// Tests primality by trial division over the 6k±1 candidates up to the
/// square root of `num`
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(num: usize) -> bool {
    if num <= 1 {
        return false;
    }
    if num <= 3 {
        return true;
    }
    if num % 2 == 0 || num % 3 == 0 {
        return false;
    }
    let mut divisor: usize = 5;
    while divisor.saturating_mul(divisor) <= num {
        if num % divisor == 0 || num % divisor.saturating_add(2) == 0 {
            return false;
        }
        divisor = divisor.saturating_add(6);
    }
    true
}

/// Returns the first prime at or above an odd lower bound derived from `num`.
///
/// Even inputs are bumped to the next odd candidate before scanning, which
/// keeps the doubled-capacity inputs (always even) on odd candidates only.
/// The result is therefore always an odd prime, never 2.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn next_prime(num: usize) -> usize {
    let mut candidate = if num % 2 == 0 { num.saturating_add(1) } else { num };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}
