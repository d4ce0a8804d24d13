use core::fmt::{self, Debug, Display, Formatter};

/// Page content in log output, redacted unless the `dangerous-logging` feature is enabled.
pub(crate) struct Content<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized + Display> Display for Content<'_, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			Display::fmt(self.0, f)
		} else {
			f.write_str("[redacted]")
		}
	}
}

impl<T: ?Sized + Debug> Debug for Content<'_, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			Debug::fmt(self.0, f)
		} else {
			f.write_str("[redacted]")
		}
	}
}
