pub mod candidates;
pub mod verification_form;
