pub(crate) mod response_ext;
