pub const MAX_LINE: usize = 80;
pub const MAX_ARGS: usize = MAX_LINE / 2 + 1;

#[derive(Debug, PartialEq, Eq)]
pub struct TokenLine<'a> {
	pub args: Vec<&'a [u8]>,
	pub background: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Command<'a> {
	pub argv: Vec<&'a [u8]>,
	pub stdin_file: Option<&'a [u8]>,
	pub stdout_file: Option<&'a [u8]>,
	pub background: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub left: Vec<&'a [u8]>,
	pub right: Vec<&'a [u8]>,
	pub background: bool,
}
