use kernel::KernelError;

/// Converts backend client errors into the kernel taxonomy at the driver
/// boundary, so callers never observe raw store errors.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
