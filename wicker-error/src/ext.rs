use crate::WickerResult;

/// Extension trait for WickerResult
pub trait ResultExt<T>: private::Sealed {
    /// Flatten a nested [`WickerResult`]. Helper function until <https://github.com/rust-lang/rust/issues/70142> is stabilized.
    fn flatten(self) -> WickerResult<T>;
}

mod private {
    use crate::WickerResult;

    pub trait Sealed {}

    impl<T> Sealed for WickerResult<WickerResult<T>> {}
}

impl<T> ResultExt<T> for WickerResult<WickerResult<T>> {
    fn flatten(self) -> WickerResult<T> {
        match self {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) | Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wicker_err;

    #[test]
    fn flatten_collapses_both_error_layers() {
        let ok: WickerResult<WickerResult<u32>> = Ok(Ok(3));
        assert_eq!(ok.flatten().unwrap(), 3);

        let inner: WickerResult<WickerResult<u32>> = Ok(Err(wicker_err!("inner")));
        assert!(inner.flatten().is_err());

        let outer: WickerResult<WickerResult<u32>> = Err(wicker_err!("outer"));
        assert!(outer.flatten().is_err());
    }
}
