//! Port of [Bob Jenkins' `lookup3.c`][0] to Rust, plus the path hash built
//! on top of it.
//!
//! Every fingerprint in the root namespace comes from [`hash_path`]: the
//! rest of the ecosystem ships pre-computed fingerprints for known paths,
//! so this implementation must stay bit-exact with the original C. These
//! functions are not intended for cryptographic purposes.
//!
//! [0]: https://www.burtleburtle.net/bob/c/lookup3.c

/// Mix 3 `u32` values reversibly.
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);

    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

/// Final mixing of 3 `u32` values into `c`.
fn final_mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

/// Returns 2 32-bit hash values through `pc` and `pb`, reading `key` in
/// chunks of 3 little-endian `u32`s.
///
/// `pc` and `pb` double as seeds; both zero matches the plain single-seed
/// variant of the original.
pub fn hashlittle2(key: &[u8], pc: &mut u32, pb: &mut u32) {
    let mut a = 0xdeadbeef_u32
        .wrapping_add((key.len() & (u32::MAX as usize)) as u32)
        .wrapping_add(*pc);
    let mut b = a;
    let mut c = a.wrapping_add(*pb);
    let mut k = key;

    if k.is_empty() {
        // Empty keys get no mixing at all
        *pc = c;
        *pb = b;
        return;
    }

    // The original C recast `uint8_t*` as `uint32_t*` and had to care about
    // alignment; copying through `from_le_bytes` sidesteps that entirely.
    while k.len() > 12 {
        // SAFETY: these unwraps cannot fail, k.len() > 12 is checked above
        // and each range is exactly 4 bytes
        a = a.wrapping_add(u32::from_le_bytes(k[0..4].try_into().unwrap()));
        b = b.wrapping_add(u32::from_le_bytes(k[4..8].try_into().unwrap()));
        c = c.wrapping_add(u32::from_le_bytes(k[8..12].try_into().unwrap()));
        mix(&mut a, &mut b, &mut c);
        k = &k[12..];
    }

    // Last, possibly-short block. The C version does a fall-through switch
    // with short reads, treating missing high bytes as 0; padding a local
    // buffer with zeroes is equivalent.
    let mut tail = [0; 12];
    tail[..k.len()].copy_from_slice(k);

    // SAFETY: tail is exactly 12 bytes, each range is exactly 4 bytes
    a = a.wrapping_add(u32::from_le_bytes(tail[0..4].try_into().unwrap()));
    if k.len() > 4 {
        b = b.wrapping_add(u32::from_le_bytes(tail[4..8].try_into().unwrap()));
    }
    if k.len() > 8 {
        c = c.wrapping_add(u32::from_le_bytes(tail[8..12].try_into().unwrap()));
    }

    final_mix(&mut a, &mut b, &mut c);

    *pc = c;
    *pb = b;
}

/// Hash a namespace path into a 64-bit fingerprint.
///
/// The path is normalised the way the game's own hasher does it (ASCII
/// uppercase, `/` becomes `\`), then the two halves of [`hashlittle2`] are
/// merged with `pc` as the high bytes. Full paths and single folder
/// segments go through this same function.
pub fn hash_path(path: &str) -> u64 {
    let normalised = path.to_ascii_uppercase().replace('/', "\\");
    let mut pc = 0;
    let mut pb = 0;
    hashlittle2(normalised.as_bytes(), &mut pc, &mut pb);

    (u64::from(pc) << 32) | u64::from(pb)
}
