//! Operator overloads. Vector-vector operators act element-wise, vector-scalar operators scale.

use std::{
    iter::Sum,
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
};

use crate::traits::Number;

use super::Vector;

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<Vector<U, N>> for Vector<T, N> {
    fn eq(&self, other: &Vector<U, N>) -> bool {
        self.0 == other.0
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Vector<T, N> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.0 == *other
    }
}

impl<T: Eq, const N: usize> Eq for Vector<T, N> {}

impl<T: Neg, const N: usize> Neg for Vector<T, N> {
    type Output = Vector<T::Output, N>;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

macro_rules! elementwise {
    ($($op:ident::$f:ident, $assign:ident::$assign_f:ident;)+) => {$(
        impl<T: $op, const N: usize> $op for Vector<T, N> {
            type Output = Vector<T::Output, N>;

            #[inline]
            fn $f(self, rhs: Self) -> Self::Output {
                let mut rhs = rhs.0.into_iter();
                self.map(|l| match rhs.next() {
                    Some(r) => l.$f(r),
                    None => unreachable!(),
                })
            }
        }

        impl<T: $assign, const N: usize> $assign for Vector<T, N> {
            #[inline]
            fn $assign_f(&mut self, rhs: Self) {
                for (l, r) in self.0.iter_mut().zip(rhs.0) {
                    l.$assign_f(r);
                }
            }
        }
    )+};
}

elementwise! {
    Add::add, AddAssign::add_assign;
    Sub::sub, SubAssign::sub_assign;
}

macro_rules! scaling {
    ($($op:ident::$f:ident, $assign:ident::$assign_f:ident;)+) => {$(
        impl<T: $op + Copy, const N: usize> $op<T> for Vector<T, N> {
            type Output = Vector<T::Output, N>;

            #[inline]
            fn $f(self, rhs: T) -> Self::Output {
                self.map(|l| l.$f(rhs))
            }
        }

        impl<T: $assign + Copy, const N: usize> $assign<T> for Vector<T, N> {
            #[inline]
            fn $assign_f(&mut self, rhs: T) {
                for l in &mut self.0 {
                    l.$assign_f(rhs);
                }
            }
        }
    )+};
}

scaling! {
    Mul::mul, MulAssign::mul_assign;
    Div::div, DivAssign::div_assign;
}

impl<T: Number, const N: usize> Sum for Vector<T, N> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use crate::{vec2, vec3, Vec3d};

    #[test]
    fn arithmetic() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(0.5, -1.0, 2.0);
        assert_eq!(a + b, [1.5, 1.0, 5.0]);
        assert_eq!(a - b, [0.5, 3.0, 1.0]);
        assert_eq!(-a, [-1.0, -2.0, -3.0]);
        assert_eq!(a * 2.0, [2.0, 4.0, 6.0]);
        assert_eq!(a / 2.0, [0.5, 1.0, 1.5]);

        let mut c = a;
        c += b;
        c -= a;
        c *= 4.0;
        c /= 2.0;
        assert_eq!(c, b * 2.0);
    }

    #[test]
    fn sum() {
        let total: Vec3d = [vec3(1.0, 0.0, 0.0), vec3(0.0, 2.0, 0.0), vec3(0.0, 0.0, 3.0)]
            .into_iter()
            .sum();
        assert_eq!(total, [1.0, 2.0, 3.0]);
        assert_eq!(std::iter::empty::<Vec3d>().sum::<Vec3d>(), Vec3d::ZERO);
        assert_eq!(vec2(1.0, 2.0)[1], 2.0);
    }
}
