use clap::{App, Arg, ArgMatches, SubCommand};
use quill_models::{
    groups::{Group, NewGroup},
    Connection,
};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("groups")
        .about("Manage groups")
        .subcommand(
            SubCommand::with_name("new")
                .about("Create a new group")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The title of the group"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The URL slug of the group, must be unique"),
                )
                .arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .help("What this group is about"),
                ),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Delete a group. Its posts are kept, they just lose their group")
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The slug of the group to delete"),
                ),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let title = args
        .value_of("title")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Title"));
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Slug"));
    let description = args.value_of("description").unwrap_or("").to_string();

    Group::insert(
        conn,
        NewGroup {
            title,
            slug,
            description,
        },
    )
    .expect("Couldn't save the group");
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Slug"));
    let group = Group::find_by_slug(conn, &slug).expect("Couldn't find this group");
    group.delete(conn).expect("Couldn't delete the group");
}
