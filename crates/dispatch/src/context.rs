/// Device identity passed through to errors for diagnostics.
///
/// The cache never inspects the context beyond rendering it into an
/// [`UnsupportedDevice`](crate::DispatchError::UnsupportedDevice) error, and
/// it plays no part in the cache key.
pub trait DiagnosticContext {
	fn describe_device(&self) -> String;
}

impl DiagnosticContext for str {
	fn describe_device(&self) -> String {
		self.to_string()
	}
}

impl DiagnosticContext for String {
	fn describe_device(&self) -> String {
		self.clone()
	}
}

impl DiagnosticContext for () {
	fn describe_device(&self) -> String {
		"unknown device".to_string()
	}
}

impl<T: DiagnosticContext + ?Sized> DiagnosticContext for &T {
	fn describe_device(&self) -> String {
		(**self).describe_device()
	}
}
