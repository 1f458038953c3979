use schema::GrowthRate;

/// Total experience needed to reach `level` under a growth class.
///
/// Level 1 always starts at zero. The Medium Slow curve dips below zero at
/// low levels; those values clamp to zero.
pub fn experience_for_level(rate: GrowthRate, level: u8) -> u32 {
    if level <= 1 {
        return 0;
    }
    let n = level as i64;
    let cube = n * n * n;

    let total = match rate {
        GrowthRate::Fast => 4 * cube / 5,
        GrowthRate::MediumFast => cube,
        GrowthRate::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
        GrowthRate::Slow => 5 * cube / 4,
        GrowthRate::Erratic => match n {
            n if n < 50 => cube * (100 - n) / 50,
            n if n < 68 => cube * (150 - n) / 100,
            n if n < 98 => cube * ((1911 - 10 * n) / 3) / 500,
            n => cube * (160 - n) / 100,
        },
        GrowthRate::Fluctuating => match n {
            n if n < 15 => cube * ((n + 1) / 3 + 24) / 50,
            n if n < 36 => cube * (n + 14) / 50,
            n => cube * (n / 2 + 32) / 50,
        },
    };

    total.clamp(0, u32::MAX as i64) as u32
}
