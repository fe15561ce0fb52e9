use ndarray::prelude::*;

/// Counts how often the wrapped objective is evaluated.
pub struct WrappedFunction<F: Fn(ArrayView1<f64>) -> f64> {
    pub num: usize,
    pub func: F,
}

impl<F: Fn(ArrayView1<f64>) -> f64> WrappedFunction<F> {
    pub fn new(func: F) -> Self {
        WrappedFunction { num: 0, func }
    }

    pub fn call(&mut self, arg: ArrayView1<f64>) -> f64 {
        self.num += 1;
        (self.func)(arg)
    }
}

/// Sum of squares of the components of `y`.
pub fn squared_norm(y: ArrayView1<f64>) -> f64 {
    y.dot(&y)
}

/// Turns a vector function into the scalar objective `sum_i f_i(x)^2`, whose zeros are
/// exactly the roots of `f`.
pub fn residual_objective<'a, F>(system: &'a F) -> impl Fn(ArrayView1<f64>) -> f64 + 'a
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    move |x: ArrayView1<f64>| squared_norm(system(x).view())
}

/// Forward-difference approximation of the Jacobian of `func` at `xk`.
/// Row `i` holds the partial derivatives of output component `i`.
pub fn approx_jacobian<F>(func: F, xk: ArrayView1<f64>) -> Array2<f64>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    let f0 = func(xk);
    let n = xk.len();
    let mut jac = Array2::<f64>::zeros((f0.len(), n));
    let mut x = xk.to_owned();
    let sqrt_eps = ::std::f64::EPSILON.sqrt();
    for k in 0..n {
        let h = sqrt_eps * xk[k].abs().max(1.0);
        x[k] = xk[k] + h;
        // the representable step, not the requested one
        let d = x[k] - xk[k];
        let fk = func(x.view());
        jac.column_mut(k).assign(&((&fk - &f0) / d));
        x[k] = xk[k];
    }
    jac
}
