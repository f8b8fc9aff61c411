/// Check whether two floats differ by at most 1e-9 times the larger magnitude (or 1e-12 absolutely, near zero).
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let tolerance = f64::max(1e-12, 1e-9 * f64::max(a.abs(), b.abs()));
        assert!((a - b).abs() <= tolerance, "{}: {} vs {}", $msg, a, b);
    }};
}
