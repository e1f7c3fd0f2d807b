use bigdecimal::{BigDecimal, RoundingMode, Zero};

/// Share of an order total paid upfront as the reservation fee.
pub fn reservation_fee_rate() -> BigDecimal {
    BigDecimal::new(35.into(), 2)
}

pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

pub fn reservation_fee(total: &BigDecimal) -> BigDecimal {
    round2(&(total * reservation_fee_rate()))
}

pub fn remaining_balance(total: &BigDecimal, reservation_fee: &BigDecimal) -> BigDecimal {
    round2(&(total - reservation_fee))
}

/// `part / whole * 100`, rounded to cents. Zero when `whole` is zero.
pub fn percentage_of(part: &BigDecimal, whole: &BigDecimal) -> BigDecimal {
    if whole.is_zero() {
        return round2(&BigDecimal::zero());
    }

    round2(&(part / whole * BigDecimal::from(100)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn reservation_fee_rounds_half_up() {
        assert_eq!(reservation_fee(&dec("100")), dec("35.00"));
        assert_eq!(reservation_fee(&dec("99.99")), dec("35.00"));
        assert_eq!(reservation_fee(&dec("10.10")), dec("3.54"));
    }

    #[test]
    fn remaining_balance_is_the_rest_of_the_total() {
        let total = dec("250.00");
        let fee = reservation_fee(&total);
        assert_eq!(remaining_balance(&total, &fee), dec("162.50"));
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage_of(&dec("5"), &dec("0")), dec("0.00"));
        assert_eq!(percentage_of(&dec("25"), &dec("200")), dec("12.50"));
    }
}
