//! Command-line argument parsing.
//!
//! Keeps argument parsing separate from execution logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use studentdir_core::{NewStudent, SortColumn, StudentPatch};

/// Student directory CLI
#[derive(Parser)]
#[command(name = "studentdir")]
#[command(about = "Browse and edit the student directory", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Data directory (overrides $STUDENTDIR_DATA_DIR and the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Skip the simulated service latency
    #[arg(long, global = true)]
    pub no_latency: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List students, optionally filtered and sorted
    List {
        /// Only students in this course (case-insensitive)
        #[arg(long)]
        course: Option<String>,

        /// Substring of name or email
        #[arg(long)]
        search: Option<String>,

        /// Sort column: name, course or year
        #[arg(long)]
        sort: Option<SortColumn>,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one student
    Show { id: String },

    /// Add a student (requires login)
    Add(AddArgs),

    /// Edit a student (requires login)
    Edit {
        id: String,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a student (requires login)
    Delete { id: String },

    /// List distinct courses
    Courses,

    /// Sign in as EMAIL
    Login { email: String },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub course: String,

    #[arg(long)]
    pub year: u8,

    /// Photo URL (a placeholder avatar is assigned when omitted)
    #[arg(long)]
    pub photo_url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl From<AddArgs> for NewStudent {
    fn from(args: AddArgs) -> Self {
        NewStudent {
            name: args.name,
            email: args.email,
            course: args.course,
            year: args.year,
            photo_url: args.photo_url,
            notes: args.notes,
        }
    }
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub course: Option<String>,

    #[arg(long)]
    pub year: Option<u8>,

    #[arg(long)]
    pub photo_url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl From<EditArgs> for StudentPatch {
    fn from(args: EditArgs) -> Self {
        StudentPatch {
            name: args.name,
            email: args.email,
            course: args.course,
            year: args.year,
            photo_url: args.photo_url,
            notes: args.notes,
        }
    }
}
