// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn account_filter() -> Arg {
    Arg::new("account")
        .long("account")
        .help("Only trades logged under this account name")
}

fn trade_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
        .arg(Arg::new("account").long("account").required(required))
        .arg(
            Arg::new("instrument")
                .long("instrument")
                .required(required)
                .help("e.g. NQ, ES, EURUSD"),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .help("range, wide-channel, narrow-channel, other, ..."),
        )
        .arg(
            Arg::new("outcome")
                .long("outcome")
                .required(required)
                .help("WIN|LOSS|BE"),
        )
        .arg(Arg::new("rr").long("rr").help("Risk-reward ratio"))
        .arg(
            Arg::new("pnl")
                .long("pnl")
                .required(required)
                .allow_hyphen_values(true),
        )
        .arg(Arg::new("emotion").long("emotion"))
        .arg(Arg::new("screenshot").long("screenshot").help("Screenshot URL"))
        .arg(Arg::new("notes").long("notes"))
}

pub fn build_cli() -> Command {
    Command::new("tradebook")
        .about("Trading journal, prop-firm account tracker, and setup checklist")
        .version(crate_version!())
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .env("TRADEBOOK_DATA_DIR")
                .help("Directory holding the tables"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .env("TRADEBOOK_BACKEND")
                .default_value("csv")
                .help("csv|sqlite"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(Command::new("init").about("Create the data directory"))
        .subcommand(
            Command::new("trade")
                .about("Log and edit trades")
                .subcommand(trade_fields(Command::new("add"), true))
                .subcommand(json_flags(
                    Command::new("list").arg(account_filter()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("10")
                            .help("Most recent N trades (0 = all)"),
                    ),
                ))
                .subcommand(trade_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("account")
                .about("Prop-firm and personal accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("firm").long("firm"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("trial")
                                .help("trial|funded"),
                        )
                        .arg(Arg::new("initial").long("initial").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(
                            Arg::new("current")
                                .long("current")
                                .help("Current balance (default: initial)"),
                        )
                        .arg(
                            Arg::new("target_days")
                                .long("target-days")
                                .value_parser(value_parser!(u32))
                                .default_value("0"),
                        )
                        .arg(Arg::new("cost").long("cost").default_value("0"))
                        .arg(
                            Arg::new("created")
                                .long("created")
                                .help("YYYY-MM-DD (default: today)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("status")
                            .long("status")
                            .help("active|historic"),
                    ),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("firm").long("firm"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("balance").long("balance").allow_hyphen_values(true))
                        .arg(Arg::new("target").long("target"))
                        .arg(
                            Arg::new("target_days")
                                .long("target-days")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("cost").long("cost"))
                        .arg(Arg::new("status").long("status").help("active|historic")),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("progress")
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include historic accounts"),
                        ),
                )),
        )
        .subcommand(
            Command::new("finance")
                .about("Expenses and payouts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("prop-firm|software|education|other-expense|payout"),
                        )
                        .arg(Arg::new("concept").long("concept"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Positive magnitude; the sign follows the kind"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(Arg::new("kind").long("kind"))))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("objective")
                .about("Trading objectives")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("task").long("task").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("once")
                                .help("daily|weekly|monthly|once"),
                        )
                        .arg(Arg::new("due").long("due"))
                        .arg(Arg::new("target_money").long("target-money")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("pending")
                            .long("pending")
                            .action(ArgAction::SetTrue),
                    ),
                ))
                .subcommand(Command::new("done").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("sub")
                .about("Recurring subscriptions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("service").long("service").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .required(true)
                                .value_parser(value_parser!(u32).range(1..=31)),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("group")
                .about("Named groups of accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("Member account name (repeatable)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("check")
                .about("Run the pre-trade checklist for a setup")
                .arg(
                    Arg::new("strategy")
                        .required(true)
                        .help("range|wide-channel|narrow-channel"),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::Append)
                        .help("Confirmed condition key (repeatable)"),
                )
                .arg(
                    Arg::new("liquidity")
                        .long("liquidity")
                        .action(ArgAction::SetTrue)
                        .help("Reaction at an FVG or liquidity zone"),
                )
                .arg(
                    Arg::new("daily_loss")
                        .long("daily-loss")
                        .allow_hyphen_values(true)
                        .help("Today's loss so far (default: from today's trades)"),
                )
                .arg(Arg::new("hours").long("hours").default_value("0"))
                .arg(
                    Arg::new("questions")
                        .long("questions")
                        .action(ArgAction::SetTrue)
                        .help("List the conditions for this setup and exit"),
                ),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Headline statistics")
                .arg(account_filter()),
        ))
        .subcommand(json_flags(
            Command::new("curve")
                .about("Cumulative PnL per trade")
                .arg(account_filter()),
        ))
        .subcommand(json_flags(
            Command::new("days")
                .about("PnL per calendar day")
                .arg(account_filter()),
        ))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("trades").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("trades")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Report inconsistencies between tables"))
}
