use std::{array, fmt};

use crate::traits::{Number, One, Sqrt, Zero};

mod ops;

pub type Vec2<T> = Vector<T, 2>;
pub type Vec2d = Vec2<f64>;
pub type Vec3<T> = Vector<T, 3>;
pub type Vec3d = Vec3<f64>;
pub type Vec4<T> = Vector<T, 4>;
pub type Vec4d = Vec4<f64>;

/// A point or direction in `N`-dimensional space.
///
/// `Vector` is a transparent wrapper around `[T; N]`. It is [`Copy`] and, for `Pod` element
/// types, [`bytemuck::Pod`], which lets a slice of vectors be reinterpreted as a flat element
/// buffer. [`MatrixView::from_rows`] and [`MatrixView::from_columns`] rely on this to hand sets of
/// basis vectors to the factorization routines without copying.
///
/// Vectors are built with [`vec2`], [`vec3`], [`vec4`], [`Vector::from_fn`], [`Vector::splat`],
/// or from an array via [`From`]. Elements are accessed by index.
///
/// [`MatrixView::from_rows`]: crate::MatrixView::from_rows
/// [`MatrixView::from_columns`]: crate::MatrixView::from_columns
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>([T; N]);

unsafe impl<T: bytemuck::Zeroable, const N: usize> bytemuck::Zeroable for Vector<T, N> {}
unsafe impl<T: bytemuck::Pod, const N: usize> bytemuck::Pod for Vector<T, N> {}

impl<T: Zero, const N: usize> Vector<T, N> {
    pub const ZERO: Self = Self([T::ZERO; N]);
}

impl<T: Zero + One, const N: usize> Vector<T, N> {
    /// Returns the unit vector along `axis`.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// assert_eq!(Vector::<f64, 3>::axis(1), vec3(0.0, 1.0, 0.0));
    /// ```
    pub fn axis(axis: usize) -> Self {
        assert!(axis < N, "axis {axis} out of range for a {N}-dimensional vector");
        Self::from_fn(|i| if i == axis { T::ONE } else { T::ZERO })
    }
}

impl<T, const N: usize> Vector<T, N> {
    #[inline]
    pub fn splat(value: T) -> Self
    where
        T: Copy,
    {
        Self([value; N])
    }

    /// Builds a vector by calling `f` with each element index.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let v = Vector::from_fn(|i| i as f64 * 0.5);
    /// assert_eq!(v, vec3(0.0, 0.5, 1.0));
    /// ```
    #[inline]
    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self(array::from_fn(f))
    }

    #[inline]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Vector<U, N> {
        Vector(self.0.map(f))
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.0
    }
}

impl<T: Number, const N: usize> Vector<T, N> {
    /// ```
    /// # use simplicial_linalg::*;
    /// assert_eq!(vec3(1.0, 3.0, -5.0).dot(vec3(4.0, -2.0, -1.0)), 3.0);
    /// ```
    pub fn dot(self, other: Self) -> T {
        self.0
            .into_iter()
            .zip(other.0)
            .fold(T::ZERO, |acc, (a, b)| acc + a * b)
    }

    #[inline]
    pub fn length2(&self) -> T {
        self.dot(*self)
    }

    #[inline]
    pub fn distance2(self, other: Self) -> T {
        (self - other).length2()
    }

    /// Returns the component of `self` parallel to `onto`, or zero if `onto` is zero.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let v = vec2(2.0, 1.0);
    /// assert_eq!(v.project_on(vec2(3.0, 0.0)), vec2(2.0, 0.0));
    /// assert_eq!(v.project_on(Vector::ZERO), vec2(0.0, 0.0));
    /// ```
    pub fn project_on(self, onto: Self) -> Self {
        let len2 = onto.length2();
        if len2 == T::ZERO {
            Self::ZERO
        } else {
            onto * (self.dot(onto) / len2)
        }
    }
}

impl<T: Number + Sqrt, const N: usize> Vector<T, N> {
    #[inline]
    pub fn length(&self) -> T {
        self.length2().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> T {
        self.distance2(other).sqrt()
    }

    /// Scales `self` to unit length. The zero vector turns into NaNs.
    pub fn normalize(self) -> Self {
        self / self.length()
    }
}

impl<T: Number> Vector<T, 2> {
    /// Rotates `self` a quarter turn counterclockwise.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// assert_eq!(vec2(1.0, 0.0).perpendicular(), vec2(0.0, 1.0));
    /// ```
    pub fn perpendicular(self) -> Self {
        let [x, y] = self.0;
        vec2(-y, x)
    }
}

impl<T: Number> Vector<T, 3> {
    /// ```
    /// # use simplicial_linalg::*;
    /// let x = vec3(1.0, 0.0, 0.0);
    /// let y = vec3(0.0, 1.0, 0.0);
    /// assert_eq!(x.cross(y), vec3(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(self, other: Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        vec3(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }
}

impl<T: Default, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(elems: [T; N]) -> Self {
        Self(elems)
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("");
        self.0.iter().for_each(|elem| {
            t.field(elem);
        });
        t.finish()
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, elem) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            elem.fmt(f)?;
        }
        f.write_str(")")
    }
}

#[inline]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vector([x, y])
}

#[inline]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vector([x, y, z])
}

#[inline]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> {
    Vector([x, y, z, w])
}
