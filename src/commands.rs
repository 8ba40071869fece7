use std::fmt;

/// A parsed chat command. Names are kept as typed; resolution happens on the
/// network worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Ping,
    Leagues,
    League { name: String },
    NextMatch { league: String },
    TopTeams { league: String },
    Relegation { league: String },
    Today { league: String },
    Last { league: String },
    Form { team: String, league: Option<String> },
    Team { team: String, league: Option<String> },
    Teams { league: Option<String> },
    Stadium { name: String },
    Refresh,
    Quit,
}

impl Command {
    /// Commands answered without touching the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Command::Start | Command::Ping | Command::Leagues | Command::Quit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    UnterminatedQuote,
    Unknown(String),
    MissingArgument { usage: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "Type a command, e.g. /leagues. Use /start for the menu."),
            CommandError::UnterminatedQuote => write!(f, "Missing closing quote."),
            CommandError::Unknown(cmd) => write!(f, "Unknown command {cmd}. Use /start for the menu."),
            CommandError::MissingArgument { usage } => write!(f, "Usage: {usage}"),
        }
    }
}

pub const MENU: &str = "Football bot commands:
/start - show this menu
/ping - connection test
/leagues - available leagues
/league <name> - league info
/nextmatch <league> - next scheduled match
/topteams <league> - league table
/relegation <league> - bottom three
/today <league> - today's matches
/last <league> - last match played
/form <team> [league] - last five results of a team
/team <team> [league] - team info
/teams [league] - teams loaded so far
/stadium <name> - who plays there
/refresh - forget cached rosters
/quit - exit

Quote names with spaces: /form \"manchester united\" premier league";

/// Split a line on whitespace, keeping double-quoted segments whole.
/// Adjacent quoted and bare text join into one token (`"a b"c` → `a bc`).
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Err(CommandError::Empty);
    };

    // Telegram-style "/cmd@botname" suffixes are ignored.
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    let rest = (!args.is_empty()).then(|| args.join(" "));

    let required = |usage: &'static str| rest.clone().ok_or(CommandError::MissingArgument { usage });

    let command = match name.as_str() {
        "/start" | "/help" => Command::Start,
        "/ping" => Command::Ping,
        "/leagues" => Command::Leagues,
        "/league" => Command::League { name: required("/league <name>")? },
        "/nextmatch" => Command::NextMatch { league: required("/nextmatch <league>")? },
        "/topteams" => Command::TopTeams { league: required("/topteams <league>")? },
        "/relegation" => Command::Relegation { league: required("/relegation <league>")? },
        "/today" => Command::Today { league: required("/today <league>")? },
        "/last" => Command::Last { league: required("/last <league>")? },
        "/form" => {
            let (team, league) = team_and_league(args, "/form <team> [league]")?;
            Command::Form { team, league }
        }
        "/team" => {
            let (team, league) = team_and_league(args, "/team <team> [league]")?;
            Command::Team { team, league }
        }
        "/teams" => Command::Teams { league: rest },
        "/stadium" => Command::Stadium { name: required("/stadium <name>")? },
        "/refresh" => Command::Refresh,
        "/quit" | "/exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(head.clone())),
    };
    Ok(command)
}

/// First token is the team; anything after it is the league qualifier.
fn team_and_league(
    args: &[String],
    usage: &'static str,
) -> Result<(String, Option<String>), CommandError> {
    let Some((team, league)) = args.split_first() else {
        return Err(CommandError::MissingArgument { usage });
    };
    let league = (!league.is_empty()).then(|| league.join(" "));
    Ok((team.clone(), league))
}
