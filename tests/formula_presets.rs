//! Formula compiler against the preset closed forms and the accepted
//! spellings.

use std::f64::consts::PI;

use assert_approx_eq::assert_approx_eq;

use harmonics::formula::{ErrorKind, Evaluator, ExpressionEvaluator};
use harmonics::synth::{FormulaBank, CUSTOM};

fn eval_all(src: &str) -> Vec<f32> {
    let f = ExpressionEvaluator.compile(src).unwrap();
    (1..32).map(|n| f(n)).collect()
}

#[test]
fn every_preset_compiles_and_is_finite() {
    let bank = FormulaBank::new();
    for name in bank.names().into_iter().filter(|n| *n != CUSTOM) {
        let formula = bank.lookup(name).unwrap();
        for src in [&formula.cosine, &formula.sine] {
            let values = eval_all(src);
            assert!(values.iter().all(|v| v.is_finite()), "{name}: {src}");
        }
    }
}

#[test]
fn square_has_only_odd_harmonics() {
    let bank = FormulaBank::new();
    let values = eval_all(&bank.lookup("square").unwrap().sine);
    for (i, &v) in values.iter().enumerate() {
        let n = (i + 1) as f64;
        if (i + 1) % 2 == 0 {
            assert_approx_eq!(v as f64, 0.0, 1e-9);
        } else {
            assert_approx_eq!(v as f64, 4.0 / (n * PI), 1e-6);
        }
    }
}

#[test]
fn saw_alternates_sign() {
    let bank = FormulaBank::new();
    let values = eval_all(&bank.lookup("saw").unwrap().sine);
    for (i, &v) in values.iter().enumerate() {
        let n = (i + 1) as f64;
        let expected = 2.0 * (-1.0f64).powf(n + 1.0) / (n * PI);
        assert_approx_eq!(v as f64, expected, 1e-6);
    }
    assert!(values[0] > 0.0);
    assert!(values[1] < 0.0);
}

#[test]
fn triangle_falls_off_with_square_of_n() {
    let bank = FormulaBank::new();
    let values = eval_all(&bank.lookup("triangle").unwrap().sine);
    assert_approx_eq!(values[0] as f64, 8.0 / (PI * PI), 1e-6);
    assert_approx_eq!(values[2] as f64, -8.0 / (9.0 * PI * PI), 1e-6);
    assert_approx_eq!(values[1] as f64, 0.0, 1e-6);
}

#[test]
fn javascript_spellings_match_plain_ones() {
    let js = eval_all("n === 1 ? 1 : 0");
    let plain = eval_all("n == 1 ? 1 : 0");
    assert_eq!(js, plain);

    let js = eval_all("2 * (-1) ** (n + 1) / (n * Math.PI)");
    let plain = eval_all("2 * (-1)^(n + 1) / (n * pi)");
    assert_eq!(js, plain);
}

#[test]
fn errors_carry_position_and_kind() {
    let err = ExpressionEvaluator.compile("1 + $").err().unwrap();
    assert_eq!(err.kind, ErrorKind::LexError);
    assert_eq!((err.line, err.col), (1, 5));

    let err = ExpressionEvaluator.compile("sin(n").err().unwrap();
    assert_eq!(err.kind, ErrorKind::ParseError);

    let err = ExpressionEvaluator.compile("k * 2").err().unwrap();
    assert!(err.message.contains('k'));

    let err = ExpressionEvaluator.compile("pow(n)").err().unwrap();
    assert_eq!(err.kind, ErrorKind::ParseError);
}
