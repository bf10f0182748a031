mod grammar;

pub(crate) use grammar::split_key;
