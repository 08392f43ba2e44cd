use uuid::Uuid;

/// Uniform sample in `[0, 1)` drawn from the random bits of a v4 UUID.
pub fn unit_interval() -> f64 {
    let bytes = Uuid::new_v4().into_bytes();
    let bits = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
    f64::from(bits) / f64::from(1_u32 << 24)
}
