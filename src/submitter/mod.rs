pub mod form_submitter;
