//! Functions available inside input templates
//!
//! | Function | Result |
//! |----------|--------|
//! | `knot_vector(degree, num_ctrlpts, clamped=true)` | uniform knot vector |
//! | `sqrt(x)` | square root |
//! | `cubert(x)` | real cube root, negative for negative `x` |
//! | `pow(x, y)` | `x` raised to `y` |

use minijinja::{Environment, Error, ErrorKind};

use crate::domain::knots;

pub fn register(env: &mut Environment<'static>) {
    env.add_function("knot_vector", knot_vector);
    env.add_function("sqrt", sqrt);
    env.add_function("cubert", cubert);
    env.add_function("pow", pow);
}

fn knot_vector(degree: usize, num_ctrlpts: usize, clamped: Option<bool>) -> Result<Vec<f64>, Error> {
    knots::generate(degree, num_ctrlpts, clamped.unwrap_or(true))
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

fn cubert(x: f64) -> f64 {
    x.cbrt()
}

fn pow(x: f64, y: f64) -> f64 {
    x.powf(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubert_keeps_sign() {
        assert_eq!(cubert(27.0), 3.0);
        assert_eq!(cubert(-8.0), -2.0);
    }

    #[test]
    fn pow_and_sqrt() {
        assert_eq!(pow(2.0, 10.0), 1024.0);
        assert_eq!(sqrt(2.25), 1.5);
    }

    #[test]
    fn knot_vector_errors_surface_as_template_errors() {
        let err = knot_vector(3, 2, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn unclamped_from_template() {
        let mut env = Environment::new();
        register(&mut env);
        let out = env
            .render_str("{{ knot_vector(1, 2, false) | length }}", minijinja::context! {})
            .unwrap();
        assert_eq!(out, "4");
    }
}
