/// A callable model that maps an input to an output.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Models behind shared references are models too.
impl<M: Model + ?Sized> Model for &M {
    type Input = M::Input;
    type Output = M::Output;
    type Error = M::Error;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        (**self).call(input)
    }
}
