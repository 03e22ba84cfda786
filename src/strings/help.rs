//! # Help Text

/// Command overview, rendered with the configured command prefix.
pub fn render(prefix: &str) -> String {
    format!(
        concat!(
            "**🤖 Courier Help**\n",
            "Use: {p}command _args_\n",
            "\n",
            "**🔁 Relayed to the automation workflow**\n",
            "* ask [message]: Ask the assistant anything\n",
            "* email [message]: Read or send mail\n",
            "* calendar [message]: Check or book events\n",
            "* note [message]: Create or list notes\n",
            "* task [message]: Create or list tasks\n",
            "\n",
            "**⚡ Answered locally**\n",
            "* ping: Check the bot is alive\n",
            "* help: Show this message\n",
        ),
        p = prefix
    )
}
