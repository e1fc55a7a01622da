use base64_simd::AsOut;

const BASE64_ENGINE: &base64_simd::Base64 = &base64_simd::STANDARD;

/// Size of the destination buffer needed to encode `count` bytes.
/// With `nul_terminated`, one extra slot is reserved for a trailing zero byte.
#[inline]
pub const fn encoded_buffer_len(count: usize, nul_terminated: bool) -> usize {
    (count + 2) / 3 * 4 + nul_terminated as usize
}

/// Encode `src` into `dst` with the standard alphabet, padding the tail
/// with `=`.
///
/// Returns the number of characters written, which is always
/// `encoded_buffer_len(src.len(), false)`. An empty `src` writes nothing and
/// returns 0; callers treat that as "nothing to flush", not as a failure.
/// If `dst` has room past the encoded text, a zero byte is stored after it
/// (not counted in the return value).
///
/// Panics if `dst` is shorter than `encoded_buffer_len(src.len(), false)`.
pub fn encode_into(src: &[u8], dst: &mut [u8]) -> usize {
    if src.is_empty() {
        return 0;
    }

    let need = encoded_buffer_len(src.len(), false);
    assert!(
        dst.len() >= need,
        "base64 destination too small: {} < {}",
        dst.len(),
        need
    );

    let written = BASE64_ENGINE.encode(src, dst[..need].as_out()).len();
    debug_assert_eq!(written, need);

    if let Some(term) = dst.get_mut(need) {
        *term = 0;
    }
    need
}

/// Encode `src` into a freshly allocated `String`.
#[inline]
pub fn encode_to_string(src: &[u8]) -> String {
    BASE64_ENGINE.encode_to_string(src)
}
