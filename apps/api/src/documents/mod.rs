// Document intake: raw upload bytes → plain text, plus candidate contact details.
// The scoring pipeline only ever sees the plain text produced here.

pub mod contact;
pub mod extract;
