pub(crate) mod checkbox;
pub(crate) mod modal;
pub(crate) mod text;
