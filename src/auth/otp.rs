use rand::Rng;
use time::{Duration, OffsetDateTime};

/// A passcode stays valid this long after issuance.
pub const OTP_TTL: Duration = Duration::minutes(10);

/// Six decimal digits, uniform in [100000, 999999].
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn expiry_from(now: OffsetDateTime) -> OffsetDateTime {
    now + OTP_TTL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits_in_range() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().expect("numeric code");
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn expiry_is_ten_minutes_after_issuance() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(expiry_from(now) - now, Duration::minutes(10));
    }
}
