//! Distributed-poll file parser.
//!
//! Parses the line-oriented survey file format into an in-memory
//! aggregate. The parser never touches the store; persistence happens
//! separately (and transactionally) in the survey service.
//!
//! Grammar, per line (whitespace-trimmed):
//!
//! - `[[Block: <name>]]` starts a new block, closing any open question
//!   and block. A question closed this way before its first empty line
//!   keeps zero options; one cut off while awaiting its first option
//!   is an error.
//! - A non-empty line with no open question starts a question (it is an
//!   error for this to happen outside a block).
//! - The first empty line after a question's text switches the question
//!   into option-collecting mode; subsequent non-empty lines are its
//!   options, and a second empty line finalizes the question.
//! - End of input finalizes an open question only if it is collecting
//!   options; a question that never reached an empty line is dropped.

use pollcast_common::{AppError, AppResult};

/// A parsed survey file: the poll name plus its blocks in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSurvey {
    /// Survey name (trailing `.txt` stripped).
    pub name: String,
    /// Blocks in file order.
    pub blocks: Vec<ParsedBlock>,
}

/// A parsed block: name plus questions in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    /// Block name.
    pub name: String,
    /// Questions in file order.
    pub questions: Vec<ParsedQuestion>,
}

/// A parsed question: text plus options in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    /// Question text.
    pub text: String,
    /// Options in file order.
    pub options: Vec<String>,
}

const BLOCK_PREFIX: &str = "[[Block:";

/// Parse a survey file into a [`ParsedSurvey`].
///
/// `name` is usually a file title; a trailing `.txt` is stripped.
pub fn parse_survey<I, S>(name: &str, lines: I) -> AppResult<ParsedSurvey>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let name = name.strip_suffix(".txt").unwrap_or(name).to_string();

    let mut blocks: Vec<ParsedBlock> = Vec::new();
    let mut current_block: Option<ParsedBlock> = None;
    let mut current_question: Option<String> = None;
    let mut current_options: Vec<String> = Vec::new();
    let mut on_options = false;

    for line in lines {
        let line = line.as_ref().trim();

        if let Some(rest) = line.strip_prefix(BLOCK_PREFIX) {
            // A block header closes any in-progress question, even one
            // that never reached an option. A question cut off while
            // awaiting its first option has no well-formed shape and is
            // a structure error.
            if let Some(text) = current_question.take() {
                if on_options && current_options.is_empty() {
                    return Err(AppError::Structure(format!(
                        "question has no options at block boundary: {text}"
                    )));
                }
                if let Some(block) = current_block.as_mut() {
                    block.questions.push(ParsedQuestion {
                        text,
                        options: std::mem::take(&mut current_options),
                    });
                }
            }
            on_options = false;
            current_options.clear();
            if let Some(block) = current_block.take() {
                blocks.push(block);
            }

            let block_name = rest.strip_suffix("]]").unwrap_or(rest).trim();
            current_block = Some(ParsedBlock {
                name: block_name.to_string(),
                questions: Vec::new(),
            });
        } else if line.is_empty() {
            if on_options {
                // Second empty line: the question is complete.
                if let (Some(text), Some(block)) = (current_question.take(), current_block.as_mut())
                {
                    block.questions.push(ParsedQuestion {
                        text,
                        options: std::mem::take(&mut current_options),
                    });
                }
                on_options = false;
            } else if current_question.is_some() {
                // First empty line after the question text.
                on_options = true;
            }
        } else if current_question.is_none() {
            if current_block.is_none() {
                return Err(AppError::Structure(format!(
                    "tried to start a question outside of a block: {line}"
                )));
            }
            current_question = Some(line.to_string());
        } else if on_options {
            current_options.push(line.to_string());
        }
        // A non-empty line between a question's text and its first empty
        // line is ignored, matching the historical file format.
    }

    // EOF finalizes a question only once it reached option-collecting
    // mode; a bare trailing question line is dropped.
    if on_options {
        if let (Some(text), Some(block)) = (current_question.take(), current_block.as_mut()) {
            block.questions.push(ParsedQuestion {
                text,
                options: current_options,
            });
        }
    }
    if let Some(block) = current_block.take() {
        blocks.push(block);
    }

    Ok(ParsedSurvey { name, blocks })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(name: &str, text: &str) -> AppResult<ParsedSurvey> {
        parse_survey(name, text.lines())
    }

    #[test]
    fn one_block_one_question_two_options() {
        let survey = parse(
            "standup.txt",
            "[[Block: Warmup]]\n\
             How are you feeling?\n\
             \n\
             Great\n\
             Tired\n\
             \n",
        )
        .unwrap();

        assert_eq!(survey.name, "standup");
        assert_eq!(survey.blocks.len(), 1);
        assert_eq!(survey.blocks[0].name, "Warmup");
        assert_eq!(survey.blocks[0].questions.len(), 1);
        assert_eq!(survey.blocks[0].questions[0].text, "How are you feeling?");
        assert_eq!(survey.blocks[0].questions[0].options, vec!["Great", "Tired"]);
    }

    #[test]
    fn question_without_options_at_eof_is_dropped() {
        let survey = parse(
            "s",
            "[[Block: A]]\n\
             Finished question?\n\
             \n\
             Yes\n\
             \n\
             Dangling question with no blank line after it",
        )
        .unwrap();

        assert_eq!(survey.blocks.len(), 1);
        // Only the finished question survives.
        assert_eq!(survey.blocks[0].questions.len(), 1);
        assert_eq!(survey.blocks[0].questions[0].text, "Finished question?");
    }

    #[test]
    fn question_collecting_at_eof_is_kept() {
        let survey = parse(
            "s",
            "[[Block: A]]\n\
             Pick one\n\
             \n\
             Left\n\
             Right",
        )
        .unwrap();

        assert_eq!(survey.blocks[0].questions.len(), 1);
        assert_eq!(survey.blocks[0].questions[0].options, vec!["Left", "Right"]);
    }

    #[test]
    fn block_with_zero_questions_is_recorded() {
        let survey = parse("s", "[[Block: Empty]]\n[[Block: Full]]\nQ\n\nO\n\n").unwrap();

        assert_eq!(survey.blocks.len(), 2);
        assert_eq!(survey.blocks[0].name, "Empty");
        assert!(survey.blocks[0].questions.is_empty());
        assert_eq!(survey.blocks[1].questions.len(), 1);
    }

    #[test]
    fn blocks_and_questions_keep_file_order() {
        let survey = parse(
            "s",
            "[[Block: Zebra]]\n\
             Second letter?\n\
             \n\
             e\n\
             \n\
             First letter?\n\
             \n\
             z\n\
             \n\
             [[Block: Apple]]\n\
             Color?\n\
             \n\
             red\n\
             \n",
        )
        .unwrap();

        let names: Vec<_> = survey.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);
        let questions: Vec<_> = survey.blocks[0]
            .questions
            .iter()
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(questions, vec!["Second letter?", "First letter?"]);
    }

    #[test]
    fn question_outside_block_is_an_error() {
        let err = parse("s", "No block here?\n").unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
    }

    #[test]
    fn question_cut_off_by_block_header_is_kept_without_options() {
        let survey = parse(
            "s",
            "[[Block: A]]\n\
             Orphan?\n\
             [[Block: B]]\n\
             Q\n\
             \n\
             O\n\
             \n",
        )
        .unwrap();

        assert_eq!(survey.blocks[0].questions.len(), 1);
        assert_eq!(survey.blocks[0].questions[0].text, "Orphan?");
        assert!(survey.blocks[0].questions[0].options.is_empty());
        assert_eq!(survey.blocks[1].questions.len(), 1);
    }

    #[test]
    fn question_awaiting_options_at_block_header_is_an_error() {
        let err = parse("s", "[[Block: A]]\nPending?\n\n[[Block: B]]\n").unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
    }

    #[test]
    fn txt_suffix_is_stripped_once() {
        assert_eq!(parse("team.txt", "").unwrap().name, "team");
        assert_eq!(parse("team", "").unwrap().name, "team");
        assert_eq!(parse("team.txt.txt", "").unwrap().name, "team.txt");
    }

    #[test]
    fn interstitial_text_before_first_blank_line_is_ignored() {
        let survey = parse(
            "s",
            "[[Block: A]]\n\
             Question?\n\
             this line is not an option\n\
             \n\
             Option\n\
             \n",
        )
        .unwrap();

        assert_eq!(survey.blocks[0].questions[0].options, vec!["Option"]);
    }
}
