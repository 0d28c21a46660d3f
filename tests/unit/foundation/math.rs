use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn ease_is_symmetric_with_flat_ends() {
    assert_eq!(ease_in_out_cosine(0.0), 0.0);
    assert!((ease_in_out_cosine(1.0) - 1.0).abs() < 1e-12);
    assert!((ease_in_out_cosine(0.5) - 0.5).abs() < 1e-12);
    for u in [0.1, 0.25, 0.4] {
        let a = ease_in_out_cosine(u);
        let b = ease_in_out_cosine(1.0 - u);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    let h = 1e-6;
    let d0 = (ease_in_out_cosine(h) - ease_in_out_cosine(0.0)) / h;
    let d1 = (ease_in_out_cosine(1.0) - ease_in_out_cosine(1.0 - h)) / h;
    assert!(d0.abs() < 1e-4);
    assert!(d1.abs() < 1e-4);
}

#[test]
fn ease_clamps_out_of_range() {
    assert_eq!(ease_in_out_cosine(-3.0), 0.0);
    assert!((ease_in_out_cosine(4.0) - 1.0).abs() < 1e-12);
}

#[test]
fn wrap_stays_in_range() {
    assert!((wrap(21.5, 20.0) - 1.5).abs() < 1e-12);
    assert!((wrap(-0.25, 1.0) - 0.75).abs() < 1e-12);
    assert_eq!(wrap(0.0, 1.0), 0.0);
}
