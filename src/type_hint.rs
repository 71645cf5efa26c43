use std::marker::PhantomData;

/// Zero-sized marker used to pin otherwise-unused type parameters on
/// operator and source structs.
pub struct TypeHint<T>(PhantomData<T>);

impl<T> TypeHint<T> {
  #[inline]
  pub fn new() -> Self { TypeHint(PhantomData) }
}

impl<T> Default for TypeHint<T> {
  #[inline]
  fn default() -> Self { Self::new() }
}

impl<T> Clone for TypeHint<T> {
  #[inline]
  fn clone(&self) -> Self { Self::new() }
}

impl<T> Copy for TypeHint<T> {}
