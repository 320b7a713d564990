use crate::acquire::VoltageWindowSeries;

/// Total signal energy: the plain sum of every window, zeros included.
#[inline]
pub fn integrate(series: &VoltageWindowSeries) -> f32 {
    let mut total = 0.0_f32;
    for value in series {
        total += *value;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::WINDOW_COUNT;

    #[test]
    fn zeros_and_ones() {
        assert_eq!(integrate(&[0.0; WINDOW_COUNT]), 0.0);
        assert_eq!(integrate(&[1.0; WINDOW_COUNT]), 20.0);
    }

    #[test]
    fn zero_padding_is_summed_not_trimmed() {
        let mut series = [0.0; WINDOW_COUNT];
        series[5] = 2.5;
        series[6] = -0.5;
        assert_eq!(integrate(&series), 2.0);
    }
}
