// Candidate video handling: audio extraction and speech-to-text.
// Everything here is fallible; `scoring::pipeline` turns failures into empty transcripts.

pub mod audio;
pub mod transcriber;
