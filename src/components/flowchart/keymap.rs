/// Editor operations reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
	Copy,
	Cut,
	Paste,
	Undo,
	Redo,
	SelectAll,
	Delete,
	ZoomIn,
	ZoomOut,
}

/// Maps a key chord to a command. `modifier` is ctrl or meta.
pub fn command_for(key: &str, modifier: bool, shift: bool) -> Option<Command> {
	if !modifier {
		return match key {
			"Backspace" | "Delete" => Some(Command::Delete),
			_ => None,
		};
	}
	match (key.to_ascii_lowercase().as_str(), shift) {
		("c", false) => Some(Command::Copy),
		("x", false) => Some(Command::Cut),
		("v", false) => Some(Command::Paste),
		("z", false) => Some(Command::Undo),
		("z", true) => Some(Command::Redo),
		("a", false) => Some(Command::SelectAll),
		("1", false) => Some(Command::ZoomIn),
		("2", false) => Some(Command::ZoomOut),
		_ => None,
	}
}
