use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use discovery::PeerRecord;
use transfer::display::bold;

#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    NoDevices,
    Chosen(&'a PeerRecord),
}

/// Pick one peer: none found, the only one, or ask on the terminal.
pub fn select_device(peers: &[PeerRecord]) -> Result<Selection<'_>> {
    select_with(peers, &mut io::stdin().lock(), &mut io::stdout())
}

pub fn select_with<'a>(
    peers: &'a [PeerRecord],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Selection<'a>> {
    match peers {
        [] => Ok(Selection::NoDevices),
        [only] => Ok(Selection::Chosen(only)),
        _ => {
            writeln!(output, "{}", bold("Devices running mounty listen:"))?;
            for (i, peer) in peers.iter().enumerate() {
                writeln!(output, "{}. {}", i + 1, peer)?;
            }

            loop {
                write!(output, "Select a device by entering its number: ")?;
                output.flush()?;

                let mut line = String::new();
                if input.read_line(&mut line).context("failed to read selection")? == 0 {
                    bail!("no device selected");
                }

                match line.trim().parse::<usize>() {
                    Ok(n) if (1..=peers.len()).contains(&n) => {
                        return Ok(Selection::Chosen(&peers[n - 1]))
                    }
                    _ => writeln!(output, "Enter a number from 1 to {}", peers.len())?,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn peers() -> Vec<PeerRecord> {
        ["kitchen", "attic", "garage"]
            .iter()
            .enumerate()
            .map(|(i, name)| PeerRecord {
                name: Some(name.to_string()),
                addr: format!("192.168.0.{}:5008", i + 10).parse().unwrap(),
            })
            .collect()
    }

    #[test]
    fn empty_list_means_no_devices() {
        let mut out = Vec::new();
        let selection = select_with(&[], &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(selection, Selection::NoDevices);
        assert!(out.is_empty());
    }

    #[test]
    fn single_peer_is_chosen_without_prompt() {
        let peers = &peers()[..1];
        let mut out = Vec::new();
        let selection = select_with(peers, &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(selection, Selection::Chosen(&peers[0]));
        assert!(out.is_empty());
    }

    #[test]
    fn menu_picks_by_number() {
        let peers = peers();
        let mut out = Vec::new();
        let selection = select_with(&peers, &mut Cursor::new("2\n"), &mut out).unwrap();

        assert_eq!(selection, Selection::Chosen(&peers[1]));
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("3. garage (192.168.0.12)"));
    }

    #[test]
    fn menu_reprompts_on_bad_input() {
        let peers = peers();
        let mut out = Vec::new();
        let selection = select_with(&peers, &mut Cursor::new("0\nabc\n9\n3\n"), &mut out).unwrap();
        assert_eq!(selection, Selection::Chosen(&peers[2]));
    }

    #[test]
    fn menu_gives_up_at_eof() {
        let peers = peers();
        let mut out = Vec::new();
        assert!(select_with(&peers, &mut Cursor::new("7\n"), &mut out).is_err());
    }
}
